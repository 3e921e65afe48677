use thiserror::Error;

/// Failure of a call to the report server
///
/// Kept `Clone` so results can travel inside UI messages; underlying errors
/// are flattened to their text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with an `error` field
    #[error("{0}")]
    Service(String),
    /// Connection, I/O or HTTP status failure without a usable body
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with something we could not read
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A local file could not be read before sending it
    #[error("cannot read {path}: {reason}")]
    File { path: String, reason: String },
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
