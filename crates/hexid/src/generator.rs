use crate::{HexId, MachineId, RollingCounter, TimeSource, WallClock};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Generates canonical ids for one resolved machine.
///
/// This is the per-process context object: it owns the machine id, the
/// shared [`RollingCounter`], and a [`TimeSource`]. Construct it once at
/// startup, after the machine id has been assigned or leased, and share it
/// (`&IdGenerator` is all any caller needs, since generation takes `&self`).
///
/// The generation path is total: no I/O, no locks, no error returns. The
/// only shared mutation is the counter's single atomic increment.
///
/// # Example
///
/// ```
/// use hexid::{IdGenerator, MachineId, WallClock};
///
/// let generator = IdGenerator::new(MachineId::new(42).unwrap(), WallClock);
/// let id = generator.next_id();
/// assert_eq!(id.len(), 20);
/// assert!(hexid::is_valid(&id));
/// ```
pub struct IdGenerator<T = WallClock>
where
    T: TimeSource<u32>,
{
    machine_id: MachineId,
    counter: RollingCounter,
    clock: T,
}

impl<T> IdGenerator<T>
where
    T: TimeSource<u32>,
{
    /// Creates a generator with a freshly seeded counter.
    pub fn new(machine_id: MachineId, clock: T) -> Self {
        Self::with_counter(machine_id, RollingCounter::default(), clock)
    }

    /// Creates a generator around an existing counter.
    ///
    /// Prefer [`Self::new`] in production; this constructor exists for
    /// callers that pin counter state, such as tests.
    pub fn with_counter(machine_id: MachineId, counter: RollingCounter, clock: T) -> Self {
        Self {
            machine_id,
            counter,
            clock,
        }
    }

    /// Returns the machine id this generator stamps into every id.
    pub fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    /// Generates the next canonical id: a 20-character lowercase hex string.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> String {
        HexId::from_parts(self.clock.current_secs(), self.machine_id, self.counter.next()).encode()
    }

    /// Generates a tagged id: a 24-character lowercase hex string carrying
    /// the given 16-bit process tag between the machine id and the counter.
    ///
    /// Receivers validating with [`is_valid`](crate::is_valid) only accept
    /// the canonical 20-character form; use this variant when both ends
    /// agree on the tagged layout.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id_tagged(&self, process_tag: u16) -> String {
        HexId::from_parts_tagged(
            self.clock.current_secs(),
            self.machine_id,
            process_tag,
            self.counter.next(),
        )
        .encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_valid;

    struct FixedTime {
        secs: u32,
    }

    impl TimeSource<u32> for FixedTime {
        fn current_secs(&self) -> u32 {
            self.secs
        }
    }

    #[test]
    fn next_id_is_canonical() {
        let generator = IdGenerator::new(MachineId::new(42).unwrap(), WallClock);
        for _ in 0..100 {
            let id = generator.next_id();
            assert_eq!(id.len(), HexId::ENCODED_LEN);
            assert!(is_valid(&id));
        }
    }

    #[test]
    fn next_id_encodes_all_components() {
        let generator = IdGenerator::with_counter(
            MachineId::new(0xAB_CDEF).unwrap(),
            RollingCounter::from_seed(0),
            FixedTime { secs: 0x5F5_E100 },
        );
        assert_eq!(generator.next_id(), "05f5e100abcdef000001");
        assert_eq!(generator.next_id(), "05f5e100abcdef000002");
    }

    #[test]
    fn consecutive_ids_differ_within_one_second() {
        let generator = IdGenerator::new(MachineId::new(1).unwrap(), FixedTime { secs: 7 });
        let a = generator.next_id();
        let b = generator.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn tagged_id_carries_the_tag() {
        let generator = IdGenerator::with_counter(
            MachineId::new(1).unwrap(),
            RollingCounter::from_seed(u64::from(RollingCounter::MAX)),
            FixedTime { secs: 1 },
        );
        let id = generator.next_id_tagged(0xBEEF);
        assert_eq!(id, "00000001000001beef000000");
        assert_eq!(id.len(), HexId::ENCODED_TAGGED_LEN);

        let decoded = HexId::decode(&id).unwrap();
        assert_eq!(decoded.process_tag(), Some(0xBEEF));
        assert_eq!(decoded.machine_id(), generator.machine_id());
    }

    #[test]
    fn decoded_ids_reflect_the_clock() {
        let generator = IdGenerator::new(
            MachineId::new(500).unwrap(),
            FixedTime { secs: 1_600_000_000 },
        );
        let decoded = HexId::decode(&generator.next_id()).unwrap();
        assert_eq!(decoded.timestamp(), 1_600_000_000);
        assert_eq!(decoded.machine_id().get(), 500);
    }
}
