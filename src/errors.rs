//! Error types for the sequenced store.
//!
//! Encode-time failures surface synchronously to the caller. Apply-time
//! failures (bad mutation, rev mismatch) ride inside the emitted [`Event`]
//! and never block sequence progress.
//!
//! [`Event`]: crate::Event

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Path fails syntactic validation.
    #[error("bad path: {0}")]
    BadPath(String),

    /// Mutation string is not parseable.
    #[error("bad mutation")]
    BadMutation,

    /// Conditional write failed; the sequence advances regardless.
    #[error("rev mismatch")]
    RevMismatch,

    /// Watch registration or wait for a sequence number already trimmed
    /// from the event log.
    #[error("too late")]
    TooLate,

    /// Glob pattern failed to compile.
    #[error("bad glob: {0}")]
    BadGlob(String),

    /// Configuration failed to load or validate.
    #[error("config: {0}")]
    Config(String),

    /// The store shut down while a caller awaited a reply.
    #[error("store closed")]
    Closed,
}

impl From<glob::PatternError> for StoreError {
    fn from(e: glob::PatternError) -> Self {
        StoreError::BadGlob(e.to_string())
    }
}

impl From<config::ConfigError> for StoreError {
    fn from(e: config::ConfigError) -> Self {
        StoreError::Config(e.to_string())
    }
}
