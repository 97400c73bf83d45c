//! Time snapshot from the board's free-running counters.

/// One reading of the millisecond and microsecond counters.
///
/// Both counters are 32-bit and wrap, like `millis()`/`micros()` on a
/// microcontroller. Elapsed time is always computed with wrapping
/// subtraction, so a wrap between two readings is harmless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instant {
    pub ms: u32,
    pub us: u32,
}

impl Instant {
    pub const fn new(ms: u32, us: u32) -> Self {
        Self { ms, us }
    }

    /// Snapshot derived from a single microsecond count.
    pub const fn from_micros(us: u64) -> Self {
        Self {
            ms: (us / 1000) as u32,
            us: us as u32,
        }
    }

    pub const fn ms_since(self, earlier_ms: u32) -> u32 {
        self.ms.wrapping_sub(earlier_ms)
    }

    pub const fn us_since(self, earlier_us: u32) -> u32 {
        self.us.wrapping_sub(earlier_us)
    }
}
