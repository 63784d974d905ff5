/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors the id codec can produce.
///
/// Generation itself is infallible; these errors surface only when
/// constructing a [`MachineId`](crate::MachineId) or when decoding foreign
/// bytes or text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine identifier must fit in three bytes and must not be zero.
    #[error("machine id must be between 1 and 16777215 (it must fit in three bytes), got {machine_id}")]
    MachineIdOutOfRange { machine_id: u32 },

    /// The input was not one of the two supported wire widths.
    #[error("id must be 10 or 12 bytes (20 or 24 hex characters), got length {len}")]
    UnexpectedLength { len: usize },

    /// A byte outside the lowercase hex alphabet was found while decoding
    /// text.
    #[error("invalid hex byte {byte:#04x} at index {index}")]
    InvalidHexByte { byte: u8, index: usize },
}
