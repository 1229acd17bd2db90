//! Shared error type across roomcast crates.

use thiserror::Error;

/// Stable error codes (safe to log, match on, or surface to callers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Could not reach the pub/sub transport.
    Connection,
    /// Value tree could not be serialized.
    Encode,
    /// Envelope bytes could not be decoded.
    Decode,
    /// Transport rejected or failed the publish.
    Publish,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Connection => "CONNECTION",
            ErrorCode::Encode => "ENCODE",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Publish => "PUBLISH",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RoomcastError>;

/// Unified error type used by core and emitter.
#[derive(Debug, Error)]
pub enum RoomcastError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RoomcastError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RoomcastError::Connection(_) => ErrorCode::Connection,
            RoomcastError::Encode(_) => ErrorCode::Encode,
            RoomcastError::Decode(_) => ErrorCode::Decode,
            RoomcastError::Publish(_) => ErrorCode::Publish,
            RoomcastError::BadConfig(_) => ErrorCode::BadConfig,
            RoomcastError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            RoomcastError::Internal(_) => ErrorCode::Internal,
        }
    }
}
