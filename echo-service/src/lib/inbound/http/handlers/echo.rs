use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::message::errors::MessageError;
use crate::message::models::Message;
use crate::message::models::UserText;

pub async fn echo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<EchoRequest>, JsonRejection>,
) -> Result<ApiSuccess<EchoResponseData>, ApiError> {
    let Json(body) = body?;
    let text = UserText::new(body.user_text).map_err(MessageError::from)?;

    state
        .message_service
        .echo(&user.username, text)
        .await
        .map_err(ApiError::from)
        .map(|ref message| ApiSuccess::new(StatusCode::OK, message.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EchoRequest {
    user_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoResponseData {
    pub id: i64,
    pub username: String,
    pub user_text: String,
    pub reply: String,
    pub formatted_message: String,
}

impl From<&Message> for EchoResponseData {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.0,
            username: message.username.clone(),
            user_text: message.user_text.clone(),
            reply: message.reply.clone(),
            formatted_message: message.formatted(),
        }
    }
}
