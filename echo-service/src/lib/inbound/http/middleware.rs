use std::sync::Arc;

use auth::Authenticator;
use auth::GateRejection;
use auth::Identity;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;
use http::header::AUTHORIZATION;

use super::handlers::ApiError;

/// Identity attached to admitted requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Identity> for AuthenticatedUser {
    fn from(identity: Identity) -> Self {
        Self {
            username: identity.subject,
            issued_at: identity.issued_at,
            expires_at: identity.expires_at,
        }
    }
}

/// Middleware that admits requests carrying a valid bearer token.
///
/// Rejected requests never reach the handler. The validator's reason is
/// logged here and not sent to the client.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = req.headers().get(AUTHORIZATION).map(|v| v.as_bytes());

    let identity = authenticator
        .admit(authorization, Utc::now())
        .map_err(|rejection| {
            match &rejection {
                GateRejection::InvalidToken(reason) => {
                    tracing::warn!(reason = %reason, "Token rejected");
                }
                other => tracing::debug!(rejection = %other, "Request not admitted"),
            }
            ApiError::Unauthorized(rejection.to_string()).into_response()
        })?;

    req.extensions_mut()
        .insert(AuthenticatedUser::from(identity));

    Ok(next.run(req).await)
}
