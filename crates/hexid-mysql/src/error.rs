/// Boxed error type carried across the store-client boundary.
///
/// Store implementations report failures as whatever error their driver
/// produces; the allocator only needs to log, count, and re-surface them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for machine-id resolution.
///
/// Configuration errors are detected before any I/O and are never retried.
/// [`Error::AllocationFailed`] is only returned after every attempt allowed
/// by the retry budget has failed, and carries the last underlying cause.
/// None of these can surface from id generation itself, which is infallible
/// once a machine id is resolved.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured store kind is not supported.
    #[error("unsupported store kind {kind:?} (only \"mysql\" is supported)")]
    UnsupportedStoreKind { kind: String },

    /// A required configuration field is missing or empty.
    #[error("store configuration field {field:?} is missing or empty")]
    MissingConfig { field: &'static str },

    /// The store endpoint could not be initialized from the configuration.
    #[error("invalid store endpoint")]
    Endpoint {
        #[source]
        source: BoxError,
    },

    /// Machine-id allocation failed after exhausting all attempts.
    #[error("machine id allocation failed after {attempts} attempt(s)")]
    AllocationFailed {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// The store returned a key that does not mask to a valid machine id.
    #[error(transparent)]
    MachineId(#[from] hexid::Error),
}
