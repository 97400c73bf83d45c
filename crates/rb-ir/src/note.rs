//! Relay masks and notes.

use core::fmt;

/// Number of relays on the board.
pub const RELAY_COUNT: usize = 8;

/// Set of active relays, one bit per relay (bit 0 = relay 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RelayMask(pub u8);

impl RelayMask {
    /// No relays active.
    pub const EMPTY: Self = Self(0);

    /// Mask with a single relay set. Indices past the last relay give an empty mask.
    pub const fn single(relay: usize) -> Self {
        if relay < RELAY_COUNT {
            Self(1 << relay)
        } else {
            Self::EMPTY
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// A rest is a note with no relays.
    pub const fn is_rest(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, relay: usize) -> bool {
        relay < RELAY_COUNT && (self.0 >> relay) & 1 == 1
    }

    /// Lowest-indexed relay in the mask, if any.
    pub const fn lowest_relay(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    /// Number of relays in the mask.
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl From<u8> for RelayMask {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl fmt::Display for RelayMask {
    /// Renders relay 0 on the left, e.g. `#..#....` for 0x09.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for relay in 0..RELAY_COUNT {
            let c = if self.contains(relay) { '#' } else { '.' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// One scheduling unit: which relays buzz, and for how long at 100% speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Note {
    pub mask: RelayMask,
    /// Nominal duration in milliseconds (before speed scaling).
    pub duration_ms: u32,
}

impl Note {
    pub const fn new(mask: u8, duration_ms: u32) -> Self {
        Self {
            mask: RelayMask(mask),
            duration_ms,
        }
    }

    /// A silent note of the given length.
    pub const fn rest(duration_ms: u32) -> Self {
        Self::new(0, duration_ms)
    }

    pub const fn is_rest(&self) -> bool {
        self.mask.is_rest()
    }
}
