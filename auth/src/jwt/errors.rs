use thiserror::Error;

use super::secret::ConfigError;

/// Error type for JWT operations.
///
/// Validation failures are kept distinct so callers can log the precise
/// reason; the access gate collapses them into a single rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,
}
