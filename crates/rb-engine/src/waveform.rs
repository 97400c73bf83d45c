//! Square-wave relay toggling.
//!
//! A relay can't play a pitch, but toggling it fast enough makes it buzz.
//! Each relay gets a "pitch" from the frequency table; a note with several
//! relays buzzes all of them at the pitch of its lowest-indexed relay.

use rb_ir::{Instant, RelayMask, RELAY_COUNT};

use crate::relay::RelayOutput;

/// Shortest full toggle period (500 Hz), to spare the relay contacts.
pub const MIN_PERIOD_US: u32 = 2000;

/// Buzz frequency in Hz for each relay index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyTable(pub [u16; RELAY_COUNT]);

impl FrequencyTable {
    /// Tuned by ear on the LC ESP32 relay board.
    pub const DEFAULT: Self = Self([45, 55, 70, 85, 100, 120, 140, 160]);

    pub const fn get(&self, relay: usize) -> u16 {
        if relay < RELAY_COUNT {
            self.0[relay]
        } else {
            0
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Frequency of the lowest set bit in `mask`; 0 for a rest.
pub const fn frequency_for_mask(mask: RelayMask, table: &FrequencyTable) -> u16 {
    match mask.lowest_relay() {
        Some(relay) => table.get(relay),
        None => 0,
    }
}

/// Half of the toggle period for `frequency_hz`, or `None` for 0 Hz.
///
/// The full period is floored at [`MIN_PERIOD_US`].
pub const fn half_period_us(frequency_hz: u16) -> Option<u32> {
    if frequency_hz == 0 {
        return None;
    }
    let mut period = 1_000_000 / frequency_hz as u32;
    if period < MIN_PERIOD_US {
        period = MIN_PERIOD_US;
    }
    Some(period / 2)
}

/// Phase state for the note currently buzzing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveformGenerator {
    /// `true` while the note's relays are energized.
    phase: bool,
    last_toggle_us: u32,
}

impl WaveformGenerator {
    pub const fn new(now_us: u32) -> Self {
        Self {
            phase: false,
            last_toggle_us: now_us,
        }
    }

    /// Start a fresh waveform: relays off, half period measured from `now_us`.
    pub fn reset(&mut self, now_us: u32) {
        self.phase = false;
        self.last_toggle_us = now_us;
    }

    pub const fn phase(&self) -> bool {
        self.phase
    }

    pub const fn last_toggle_us(&self) -> u32 {
        self.last_toggle_us
    }

    /// Advance the waveform for an active note.
    ///
    /// Writes to `out` only when a half period has elapsed. A mask whose
    /// frequency is 0 (a zeroed table entry) holds the relays off instead.
    pub fn tick<R: RelayOutput + ?Sized>(
        &mut self,
        mask: RelayMask,
        table: &FrequencyTable,
        now: Instant,
        out: &mut R,
    ) {
        let Some(half_period) = half_period_us(frequency_for_mask(mask, table)) else {
            out.all_off();
            return;
        };

        if now.us_since(self.last_toggle_us) >= half_period {
            self.last_toggle_us = now.us;
            self.phase = !self.phase;
            out.apply_mask(if self.phase { mask } else { RelayMask::EMPTY });
        }
    }
}
