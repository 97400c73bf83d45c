//! Simulated relay board for running without hardware.

use rb_engine::{RelayOutput, StatusIndicator};
use rb_ir::{RelayMask, RELAY_COUNT};

/// Eight relays in memory, with activity counters.
#[derive(Clone, Debug, Default)]
pub struct SimRelays {
    pins: [u8; RELAY_COUNT],
    mask: RelayMask,
    writes: u64,
    changes: u64,
    /// Off-to-on transitions per relay.
    clicks: [u64; RELAY_COUNT],
}

impl SimRelays {
    pub fn new(pins: [u8; RELAY_COUNT]) -> Self {
        Self {
            pins,
            ..Self::default()
        }
    }

    /// Mask currently applied.
    pub fn mask(&self) -> RelayMask {
        self.mask
    }

    /// Total `apply_mask` calls, including repeats.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Writes that changed the mask.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn clicks(&self) -> &[u64; RELAY_COUNT] {
        &self.clicks
    }

    pub fn pins(&self) -> &[u8; RELAY_COUNT] {
        &self.pins
    }

    pub fn reset_counters(&mut self) {
        self.writes = 0;
        self.changes = 0;
        self.clicks = [0; RELAY_COUNT];
    }
}

impl RelayOutput for SimRelays {
    fn apply_mask(&mut self, mask: RelayMask) {
        self.writes += 1;
        if mask == self.mask {
            return;
        }
        let rising = mask.bits() & !self.mask.bits();
        for (relay, clicks) in self.clicks.iter_mut().enumerate() {
            if rising & (1 << relay) != 0 {
                *clicks += 1;
            }
        }
        log::trace!("relays {} -> {}", self.mask, mask);
        self.mask = mask;
        self.changes += 1;
    }
}

/// Status LED in memory.
#[derive(Clone, Debug, Default)]
pub struct SimLed {
    pin: u8,
    on: bool,
}

impl SimLed {
    pub fn new(pin: u8) -> Self {
        Self { pin, on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl StatusIndicator for SimLed {
    fn set_playing(&mut self, playing: bool) {
        if self.on != playing {
            log::debug!("status led (gpio {}) {}", self.pin, if playing { "on" } else { "off" });
        }
        self.on = playing;
    }
}
