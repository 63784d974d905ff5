use crate::{RandSource, ThreadRandom};
use portable_atomic::{AtomicU64, Ordering};

/// A lock-free, process-wide rolling 24-bit counter.
///
/// Every generated id consumes one counter value; within a single clock
/// second the counter is what keeps ids from one machine distinct. Values
/// cycle through `[0, 0xFF_FFFF]` and the value after [`RollingCounter::MAX`]
/// is `0`.
///
/// The counter is seeded from a cryptographically secure random source so
/// that a process restarting within the same clock second is unlikely to
/// re-issue the counter values of its predecessor.
///
/// Internally the state is a monotonically advancing [`AtomicU64`]; `next`
/// is a single `fetch_add` with the result masked to 24 bits. There is no
/// read-modify-write window, so concurrent callers can never observe the
/// same value twice before the counter has wrapped the full 24-bit space.
pub struct RollingCounter {
    state: AtomicU64,
}

impl RollingCounter {
    /// Largest value the counter can return.
    pub const MAX: u32 = 0xFF_FFFF;

    const MASK: u64 = Self::MAX as u64;

    /// Creates a counter seeded from the given random source.
    pub fn new<R: RandSource<u64>>(rand: &R) -> Self {
        Self::from_seed(rand.rand())
    }

    /// Creates a counter with explicit state.
    ///
    /// Useful for restoring a known position or pinning the counter in
    /// tests; prefer [`Self::new`] (or [`Default`]) in production so the
    /// seed stays unpredictable.
    pub const fn from_seed(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// Atomically advances the counter and returns the post-increment value
    /// masked to 24 bits.
    pub fn next(&self) -> u32 {
        let raw = self.state.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        (raw & Self::MASK) as u32
    }
}

impl Default for RollingCounter {
    /// A counter seeded from [`ThreadRandom`].
    fn default() -> Self {
        Self::new(&ThreadRandom)
    }
}
