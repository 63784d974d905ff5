use crate::hex::{decode_hex, encode_hex};
use crate::{Error, Result};
use core::fmt;

/// A machine identifier: an integer in `[1, 0xFF_FFFF]`.
///
/// The value must fit in the id's three-byte field and must not be zero, so
/// that an unset id can never be mistaken for a real one. Construction is the
/// single validation point; once built, a `MachineId` is immutable and every
/// consumer can rely on the range invariant.
///
/// # Example
///
/// ```
/// use hexid::MachineId;
///
/// let machine_id = MachineId::new(42).unwrap();
/// assert_eq!(machine_id.get(), 42);
///
/// assert!(MachineId::new(0).is_err());
/// assert!(MachineId::new(0x0100_0000).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MachineId(u32);

impl MachineId {
    /// Smallest valid machine id.
    pub const MIN: u32 = 1;

    /// Largest valid machine id (three bytes, all ones).
    pub const MAX: u32 = 0xFF_FFFF;

    /// Validates and wraps a raw machine id.
    pub fn new(machine_id: u32) -> Result<Self> {
        if machine_id < Self::MIN || machine_id > Self::MAX {
            return Err(Error::MachineIdOutOfRange { machine_id });
        }
        Ok(Self(machine_id))
    }

    /// Returns the raw value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for MachineId {
    type Error = Error;

    fn try_from(machine_id: u32) -> Result<Self> {
        Self::new(machine_id)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A decoded identifier: timestamp, machine id, optional process tag, and
/// counter.
///
/// Two wire variants exist, selected by whether a process tag is present.
/// All fields are big-endian, so the byte (and hex) form sorts by creation
/// time first.
///
/// ```text
///  Byte index:   0            3   4          6   7          9
///                +--------------+--------------+--------------+
///  no-tag:       | timestamp(4) | machine (3)  | counter (3)  |
///                +--------------+--------------+--------------+
///
///  Byte index:   0            3   4          6   7    8   9         11
///                +--------------+--------------+--------+--------------+
///  tagged:       | timestamp(4) | machine (3)  | tag(2) | counter (3)  |
///                +--------------+--------------+--------+--------------+
/// ```
///
/// The canonical text form is the no-tag variant: 20 lowercase hex
/// characters. The tagged variant (24 characters) is a distinct wire layout
/// carrying a 16-bit tag of the originating process.
///
/// # Example
///
/// ```
/// use hexid::{HexId, MachineId};
///
/// let id = HexId::from_parts(1, MachineId::new(1).unwrap(), 0);
/// assert_eq!(id.encode(), "00000001000001000000");
///
/// let back = HexId::decode("00000001000001000000").unwrap();
/// assert_eq!(back, id);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HexId {
    timestamp: u32,
    machine_id: MachineId,
    process_tag: Option<u16>,
    counter: u32,
}

/// Byte image of an id: a fixed-capacity buffer holding 10 or 12 bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IdBytes {
    buf: [u8; HexId::TAGGED_LEN],
    len: usize,
}

impl IdBytes {
    /// The occupied prefix of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AsRef<[u8]> for IdBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl HexId {
    /// Wire width of the no-tag variant, in bytes.
    pub const LEN: usize = 10;

    /// Wire width of the tagged variant, in bytes.
    pub const TAGGED_LEN: usize = 12;

    /// Text width of the no-tag variant: 20 hex characters.
    pub const ENCODED_LEN: usize = Self::LEN * 2;

    /// Text width of the tagged variant: 24 hex characters.
    pub const ENCODED_TAGGED_LEN: usize = Self::TAGGED_LEN * 2;

    /// Mask for the three-byte counter field.
    pub const COUNTER_MASK: u32 = 0xFF_FFFF;

    /// Builds a no-tag id from its components.
    ///
    /// The counter keeps only its low three bytes; the machine id carries its
    /// range invariant from [`MachineId::new`], so this cannot fail.
    pub const fn from_parts(timestamp_secs: u32, machine_id: MachineId, counter: u32) -> Self {
        Self {
            timestamp: timestamp_secs,
            machine_id,
            process_tag: None,
            counter: counter & Self::COUNTER_MASK,
        }
    }

    /// Builds a tagged id from its components.
    pub const fn from_parts_tagged(
        timestamp_secs: u32,
        machine_id: MachineId,
        process_tag: u16,
        counter: u32,
    ) -> Self {
        Self {
            timestamp: timestamp_secs,
            machine_id,
            process_tag: Some(process_tag),
            counter: counter & Self::COUNTER_MASK,
        }
    }

    /// Returns the timestamp in seconds since the Unix epoch.
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Returns the machine id.
    pub const fn machine_id(&self) -> MachineId {
        self.machine_id
    }

    /// Returns the process tag, if this is the tagged variant.
    pub const fn process_tag(&self) -> Option<u16> {
        self.process_tag
    }

    /// Returns the counter value.
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Serializes to the fixed-width big-endian byte image (10 or 12 bytes).
    pub fn to_bytes(&self) -> IdBytes {
        let mut buf = [0u8; Self::TAGGED_LEN];
        buf[0..4].copy_from_slice(&self.timestamp.to_be_bytes());
        buf[4..7].copy_from_slice(&self.machine_id.get().to_be_bytes()[1..4]);

        let len = match self.process_tag {
            Some(tag) => {
                buf[7..9].copy_from_slice(&tag.to_be_bytes());
                buf[9..12].copy_from_slice(&self.counter.to_be_bytes()[1..4]);
                Self::TAGGED_LEN
            }
            None => {
                buf[7..10].copy_from_slice(&self.counter.to_be_bytes()[1..4]);
                Self::LEN
            }
        };
        IdBytes { buf, len }
    }

    /// Deserializes an id from its byte image.
    ///
    /// The variant is selected by length: 10 bytes for no-tag, 12 for
    /// tagged. Any other length is an [`Error::UnexpectedLength`], and an
    /// embedded machine id of zero is rejected the same way it is at encode
    /// time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let tagged = match bytes.len() {
            Self::LEN => false,
            Self::TAGGED_LEN => true,
            len => return Err(Error::UnexpectedLength { len }),
        };

        let timestamp = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let machine_id = MachineId::new(u32::from_be_bytes([0, bytes[4], bytes[5], bytes[6]]))?;

        let (process_tag, c) = if tagged {
            (Some(u16::from_be_bytes([bytes[7], bytes[8]])), 9)
        } else {
            (None, 7)
        };
        let counter = u32::from_be_bytes([0, bytes[c], bytes[c + 1], bytes[c + 2]]);

        Ok(Self {
            timestamp,
            machine_id,
            process_tag,
            counter,
        })
    }

    /// Encodes this id into its lowercase hex text form.
    ///
    /// The output is exactly twice the byte width: 20 characters for the
    /// no-tag variant, 24 for the tagged one.
    pub fn encode(&self) -> String {
        let mut buf = [0u8; Self::ENCODED_TAGGED_LEN];
        let out = self.encode_to_buf(&mut buf);
        out.to_owned()
    }

    /// Zero-allocation variant of [`Self::encode`]: writes into the caller's
    /// buffer and returns the encoded prefix as `&str`.
    pub fn encode_to_buf<'a>(&self, buf: &'a mut [u8; Self::ENCODED_TAGGED_LEN]) -> &'a str {
        let bytes = self.to_bytes();
        let out = &mut buf[..bytes.as_slice().len() * 2];
        encode_hex(bytes.as_slice(), out);
        // SAFETY: the hex alphabet is ASCII.
        unsafe { core::str::from_utf8_unchecked(out) }
    }

    /// Decodes an id from its hex text form.
    ///
    /// Strict inverse of [`Self::encode`]: the input must be exactly 20 or
    /// 24 characters of lowercase hex. This is narrower than
    /// [`is_valid`](crate::is_valid), which accepts the full historical
    /// `[0-9a-z]` class without interpreting the content.
    pub fn decode(input: &str) -> Result<Self> {
        let len = match input.len() {
            Self::ENCODED_LEN => Self::LEN,
            Self::ENCODED_TAGGED_LEN => Self::TAGGED_LEN,
            len => return Err(Error::UnexpectedLength { len }),
        };

        let mut bytes = [0u8; Self::TAGGED_LEN];
        decode_hex(input.as_bytes(), &mut bytes[..len])?;
        Self::from_bytes(&bytes[..len])
    }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; Self::ENCODED_TAGGED_LEN];
        f.write_str(self.encode_to_buf(&mut buf))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HexId {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HexId {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct HexIdVisitor;

        impl serde::de::Visitor<'_> for HexIdVisitor {
            type Value = HexId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 20- or 24-character lowercase hex id")
            }

            fn visit_str<E>(self, value: &str) -> core::result::Result<HexId, E>
            where
                E: serde::de::Error,
            {
                HexId::decode(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(id: u32) -> MachineId {
        MachineId::new(id).unwrap()
    }

    #[test]
    fn machine_id_bounds() {
        assert!(MachineId::new(0).is_err());
        assert!(MachineId::new(0x0100_0000).is_err());
        assert_eq!(MachineId::new(1).unwrap().get(), 1);
        assert_eq!(MachineId::new(0xFF_FFFF).unwrap().get(), 0xFF_FFFF);

        assert_eq!(
            MachineId::new(0x0100_0000).unwrap_err(),
            Error::MachineIdOutOfRange {
                machine_id: 0x0100_0000
            }
        );
    }

    #[test]
    fn encode_known_vector_minimal() {
        let id = HexId::from_parts(1, machine(1), 0);
        assert_eq!(
            id.to_bytes().as_slice(),
            &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(id.encode(), "00000001000001000000");
        assert_eq!(id.encode().len(), HexId::ENCODED_LEN);
    }

    #[test]
    fn encode_known_vector_mixed() {
        let id = HexId::from_parts(0x5F5_E100, machine(0xAB_CDEF), 1);
        assert_eq!(id.encode(), "05f5e100abcdef000001");
    }

    #[test]
    fn encode_known_vector_tagged() {
        let id = HexId::from_parts_tagged(1, machine(1), 0xBEEF, 0);
        assert_eq!(id.encode(), "00000001000001beef000000");
        assert_eq!(id.encode().len(), HexId::ENCODED_TAGGED_LEN);
    }

    #[test]
    fn byte_round_trip_no_tag() {
        let id = HexId::from_parts(0xDEAD_BEEF, machine(0xFF_FFFF), 0x12_3456);
        let back = HexId::from_bytes(id.to_bytes().as_slice()).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.timestamp(), 0xDEAD_BEEF);
        assert_eq!(back.machine_id().get(), 0xFF_FFFF);
        assert_eq!(back.process_tag(), None);
        assert_eq!(back.counter(), 0x12_3456);
    }

    #[test]
    fn byte_round_trip_tagged() {
        let id = HexId::from_parts_tagged(42, machine(7), 0x0102, 0xFF_FFFF);
        let back = HexId::from_bytes(id.to_bytes().as_slice()).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.process_tag(), Some(0x0102));
        assert_eq!(back.counter(), 0xFF_FFFF);
    }

    #[test]
    fn from_bytes_rejects_other_lengths() {
        for len in [0usize, 9, 11, 13] {
            let bytes = vec![0u8; len];
            assert_eq!(
                HexId::from_bytes(&bytes).unwrap_err(),
                Error::UnexpectedLength { len },
            );
        }
    }

    #[test]
    fn from_bytes_rejects_zero_machine_id() {
        // Valid length, but machine id bytes are all zero.
        let bytes = [0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(
            HexId::from_bytes(&bytes),
            Err(Error::MachineIdOutOfRange { machine_id: 0 })
        ));
    }

    #[test]
    fn counter_keeps_low_three_bytes() {
        let id = HexId::from_parts(0, machine(1), 0x1FFF_FFFF);
        assert_eq!(id.counter(), 0xFF_FFFF);
    }

    #[test]
    fn text_round_trip() {
        let id = HexId::from_parts(0x6890_0000, machine(0xAB_CDEF), 0x00_0001);
        assert_eq!(HexId::decode(&id.encode()).unwrap(), id);

        let tagged = HexId::from_parts_tagged(0x6890_0000, machine(3), 0xFFFF, 5);
        assert_eq!(HexId::decode(&tagged.encode()).unwrap(), tagged);
    }

    #[test]
    fn decode_rejects_bad_text() {
        assert_eq!(
            HexId::decode("").unwrap_err(),
            Error::UnexpectedLength { len: 0 }
        );
        assert_eq!(
            HexId::decode("00000001000001000000ff").unwrap_err(),
            Error::UnexpectedLength { len: 22 }
        );
        // Uppercase is not canonical.
        assert_eq!(
            HexId::decode("05F5E100ABCDEF000001").unwrap_err(),
            Error::InvalidHexByte {
                byte: b'F',
                index: 2
            },
        );
        // 'g' passes the relaxed validator but is not hex.
        assert!(matches!(
            HexId::decode("g0000001000001000000"),
            Err(Error::InvalidHexByte { byte: b'g', index: 0 })
        ));
    }

    #[test]
    fn display_matches_encode() {
        let id = HexId::from_parts(77, machine(8), 9);
        assert_eq!(id.to_string(), id.encode());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trips_as_hex_string() {
        let id = HexId::from_parts(1, machine(1), 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000001000001000000\"");

        let back: HexId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<HexId>("\"not an id\"").is_err());
    }
}
