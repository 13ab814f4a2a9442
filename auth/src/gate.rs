//! Request gating policy for protected endpoints.
//!
//! Framework independent: the HTTP layer hands over the raw `Authorization`
//! header bytes and receives either an [`Identity`] to attach to the request
//! or a [`GateRejection`] to answer with 401.

use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::Identity;
use crate::jwt::JwtError;
use crate::jwt::TokenValidator;

/// Scheme prefix required on the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was not admitted.
///
/// `InvalidToken` keeps the validator's reason as its source for logging,
/// but its message never reveals it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("Authorization header is required")]
    AuthorizationHeaderMissing,

    #[error("Invalid authorization format. Expected: Bearer <token>")]
    InvalidAuthorizationFormat,

    #[error("Invalid token")]
    InvalidToken(#[source] JwtError),
}

/// Admit or reject a request based on its `Authorization` header.
pub fn admit(
    validator: &TokenValidator,
    authorization: Option<&[u8]>,
    now: DateTime<Utc>,
) -> Result<Identity, GateRejection> {
    let header = authorization.ok_or(GateRejection::AuthorizationHeaderMissing)?;
    let token = bearer_token(header)?;

    validator
        .validate(token, now)
        .map_err(GateRejection::InvalidToken)
}

fn bearer_token(header: &[u8]) -> Result<&str, GateRejection> {
    std::str::from_utf8(header)
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(GateRejection::InvalidAuthorizationFormat)
}
