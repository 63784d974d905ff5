use std::time::{SystemTime, UNIX_EPOCH};

/// A trait for time sources that return the current time in whole seconds.
///
/// This abstraction allows plugging in the system clock in production and a
/// fixed or stepped clock in tests.
///
/// # Example
///
/// ```
/// use hexid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u32> for FixedTime {
///     fn current_secs(&self) -> u32 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_secs(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in seconds since the Unix epoch.
    fn current_secs(&self) -> T;
}

/// The production time source: the local wall clock.
///
/// Ids store whole seconds in a 4-byte field, so the value is truncated to
/// `u32` (wraps in 2106, together with the wire format).
#[derive(Default, Clone, Copy, Debug)]
pub struct WallClock;

impl TimeSource<u32> for WallClock {
    fn current_secs(&self) -> u32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX_EPOCH")
            .as_secs() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z
        assert!(WallClock.current_secs() > 1_577_836_800);
    }
}
