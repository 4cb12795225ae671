//! Error types shared across the crate.

use thiserror::Error;

use crate::host::HostError;

/// Convenience alias used by every fallible operation in the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced at the command boundary.
///
/// None of these are retried. A failure aborts the rest of the command and
/// leaves any mutation already applied in place.
#[derive(Error, Debug)]
pub enum Error {
    /// A host RPC call failed.
    #[error(transparent)]
    HostCommunication(#[from] HostError),
    /// The source buffer is not valid JSON.
    #[error("invalid JSON in buffer: {0}")]
    Decode(#[source] serde_json::Error),
    /// The query expression is malformed or failed during evaluation.
    #[error("query `{expression}` failed: {message}")]
    Query { expression: String, message: String },
    /// The host's scripted output channel returned something unusable.
    #[error("unexpected host response: {0}")]
    UnexpectedHostResponse(String),
    /// The result value could not be rendered.
    #[error("failed to render result: {0}")]
    Encode(#[source] serde_json::Error),
    /// The command was invoked with the wrong name or argument count.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Whether this error came from the host transport rather than user input.
    pub const fn is_host_failure(&self) -> bool {
        matches!(
            self,
            Self::HostCommunication(_) | Self::UnexpectedHostResponse(_)
        )
    }
}
