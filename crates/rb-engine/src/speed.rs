//! Speed percentage and duration scaling.

/// Shortest effective note length, so fast playback never collapses a note to nothing.
pub const MIN_EFFECTIVE_MS: u32 = 30;

/// Longest effective note length (10 minutes).
pub const MAX_EFFECTIVE_MS: u32 = 600_000;

/// Playback speed as a percentage of nominal, always within `MIN..=MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedPercent(u16);

impl SpeedPercent {
    pub const MIN: u16 = 50;
    pub const MAX: u16 = 300;
    /// Power-on speed.
    pub const DEFAULT: Self = Self(150);
    /// Nominal speed: durations are used as encoded.
    pub const NORMAL: Self = Self(100);

    /// Clamp any requested value into range.
    pub const fn new(percent: i32) -> Self {
        let clamped = if percent < Self::MIN as i32 {
            Self::MIN
        } else if percent > Self::MAX as i32 {
            Self::MAX
        } else {
            percent as u16
        };
        Self(clamped)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    /// Effective duration of a note at this speed.
    pub const fn scale(self, nominal_ms: u32) -> u32 {
        scale_clamped(nominal_ms, self.0 as u64)
    }
}

impl Default for SpeedPercent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i32> for SpeedPercent {
    fn from(percent: i32) -> Self {
        Self::new(percent)
    }
}

/// `nominal_ms * 100 / speed_percent`, clamped to
/// `[MIN_EFFECTIVE_MS, MAX_EFFECTIVE_MS]`.
///
/// Out-of-range speeds are clamped to `[50, 300]` first, so zero or
/// negative input cannot divide by zero.
pub const fn scaled_duration(nominal_ms: u32, speed_percent: i32) -> u32 {
    SpeedPercent::new(speed_percent).scale(nominal_ms)
}

const fn scale_clamped(nominal_ms: u32, speed: u64) -> u32 {
    // u64: u32::MAX * 100 does not fit in 32 bits
    let d = nominal_ms as u64 * 100 / speed;
    if d < MIN_EFFECTIVE_MS as u64 {
        MIN_EFFECTIVE_MS
    } else if d > MAX_EFFECTIVE_MS as u64 {
        MAX_EFFECTIVE_MS
    } else {
        d as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_speed_halves_duration() {
        assert_eq!(scaled_duration(200, 200), 100);
    }

    #[test]
    fn nominal_speed_keeps_duration() {
        assert_eq!(scaled_duration(1234, 100), 1234);
    }

    #[test]
    fn short_notes_floor_at_30ms() {
        assert_eq!(scaled_duration(10, 300), 30);
        assert_eq!(scaled_duration(0, 100), 30);
    }

    #[test]
    fn long_notes_cap_at_ten_minutes() {
        assert_eq!(scaled_duration(10_000_000, 50), 600_000);
        assert_eq!(scaled_duration(u32::MAX, 50), 600_000);
    }

    #[test]
    fn half_speed_doubles_duration() {
        assert_eq!(scaled_duration(150, 50), 300);
    }

    #[test]
    fn out_of_range_speed_is_clamped() {
        assert_eq!(scaled_duration(300, 0), scaled_duration(300, 50));
        assert_eq!(scaled_duration(300, -20), 600);
        assert_eq!(scaled_duration(900, 1000), 300);
    }

    #[test]
    fn speed_percent_clamps_on_construction() {
        assert_eq!(SpeedPercent::new(10).get(), 50);
        assert_eq!(SpeedPercent::new(120).get(), 120);
        assert_eq!(SpeedPercent::new(9999).get(), 300);
        assert_eq!(SpeedPercent::default().get(), 150);
    }

    #[test]
    fn result_always_within_bounds() {
        for speed in 50..=300 {
            for nominal in (0..=10_000_000u32).step_by(9_973) {
                let d = scaled_duration(nominal, speed);
                assert!((MIN_EFFECTIVE_MS..=MAX_EFFECTIVE_MS).contains(&d));
            }
        }
    }

    #[test]
    fn non_increasing_in_speed() {
        for nominal in [0, 10, 99, 1_000, 45_678, 3_000_000, 10_000_000] {
            let mut prev = u32::MAX;
            for speed in 50..=300 {
                let d = scaled_duration(nominal, speed);
                assert!(d <= prev, "nominal {nominal}: {d} > {prev} at speed {speed}");
                prev = d;
            }
        }
    }
}
