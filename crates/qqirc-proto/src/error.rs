//! Error types for the IRC protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Transport-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Length of the offending data.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Errors produced while parsing a single IRC line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    /// The line was empty (or whitespace only).
    #[error("empty message")]
    EmptyMessage,

    /// A prefix was present but no command followed it.
    #[error("missing command")]
    MissingCommand,

    /// A numeric command that is not a three digit code.
    #[error("invalid numeric: {0}")]
    InvalidNumeric(String),
}
