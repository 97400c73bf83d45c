//! Relay output and status indicator seams.

use rb_ir::{RelayMask, RELAY_COUNT};

/// Something that can switch the eight relays.
///
/// Writes must be idempotent: the engine re-applies the same mask on
/// every tick of a rest note.
pub trait RelayOutput {
    /// Set each relay active iff its bit is set in `mask`.
    fn apply_mask(&mut self, mask: RelayMask);

    fn all_off(&mut self) {
        self.apply_mask(RelayMask::EMPTY);
    }
}

/// The "now playing" indicator (a status LED on the board).
pub trait StatusIndicator {
    fn set_playing(&mut self, playing: bool);
}

/// A single digital output line.
pub trait OutputLine {
    fn set_high(&mut self);
    fn set_low(&mut self);
}

/// Eight output lines driven as one relay bank, active-high.
pub struct RelayBank<L> {
    lines: [L; RELAY_COUNT],
}

impl<L: OutputLine> RelayBank<L> {
    /// Wrap the lines and drive them all low.
    pub fn new(lines: [L; RELAY_COUNT]) -> Self {
        let mut bank = Self { lines };
        bank.all_off();
        bank
    }

    pub fn lines(&self) -> &[L; RELAY_COUNT] {
        &self.lines
    }

    pub fn into_lines(self) -> [L; RELAY_COUNT] {
        self.lines
    }
}

impl<L: OutputLine> RelayOutput for RelayBank<L> {
    fn apply_mask(&mut self, mask: RelayMask) {
        for (relay, line) in self.lines.iter_mut().enumerate() {
            if mask.contains(relay) {
                line.set_high();
            } else {
                line.set_low();
            }
        }
    }
}

impl<T: RelayOutput + ?Sized> RelayOutput for &mut T {
    fn apply_mask(&mut self, mask: RelayMask) {
        (**self).apply_mask(mask);
    }
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for &mut T {
    fn set_playing(&mut self, playing: bool) {
        (**self).set_playing(playing);
    }
}

/// Boards without a status LED.
impl StatusIndicator for () {
    fn set_playing(&mut self, _playing: bool) {}
}
