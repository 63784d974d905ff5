use rand::{Rng, rng};

/// A source of random bits, used to seed counters.
///
/// This abstraction exists so tests can pin seeds; production code uses
/// [`ThreadRandom`].
pub trait RandSource<T> {
    /// Returns a fresh random value.
    fn rand(&self) -> T;
}

/// A [`RandSource`] that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and
/// automatically reseeded periodically. Each OS thread has its own instance,
/// so calls from multiple threads are contention-free. This type does not
/// store the RNG itself; it accesses the thread-local generator on each call,
/// which is why it is freely `Send` and `Sync` even though `ThreadRng` is not.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
