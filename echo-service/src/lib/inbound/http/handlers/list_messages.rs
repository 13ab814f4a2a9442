use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::message::models::Message;

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<MessageData>>, ApiError> {
    state
        .message_service
        .list_messages(&user.username)
        .await
        .map_err(ApiError::from)
        .map(|messages| {
            ApiSuccess::new(
                StatusCode::OK,
                messages.iter().map(MessageData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub id: i64,
    pub username: String,
    pub user_text: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Message> for MessageData {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.0,
            username: message.username.clone(),
            user_text: message.user_text.clone(),
            reply: message.reply.clone(),
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}
