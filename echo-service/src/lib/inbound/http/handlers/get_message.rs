use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::list_messages::MessageData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::message::models::MessageId;

pub async fn get_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(message_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let message_id = message_id
        .parse::<i64>()
        .map(MessageId)
        .map_err(|_| ApiError::BadRequest(format!("Invalid message id: {}", message_id)))?;

    state
        .message_service
        .get_message(&user.username, message_id)
        .await
        .map_err(ApiError::from)
        .map(|ref message| ApiSuccess::new(StatusCode::OK, message.into()))
}
