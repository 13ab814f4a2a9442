use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::message::errors::MessageError;
use crate::message::models::Message;
use crate::message::models::MessageId;
use crate::message::models::NewMessage;
use crate::message::models::UserText;
use crate::message::ports::CompletionClient;
use crate::message::ports::MessageRepository;
use crate::message::ports::MessageServicePort;

/// Relays user text to the completion API and keeps the history.
pub struct MessageService<MR, CC>
where
    MR: MessageRepository,
    CC: CompletionClient,
{
    repository: Arc<MR>,
    completion_client: Arc<CC>,
}

impl<MR, CC> MessageService<MR, CC>
where
    MR: MessageRepository,
    CC: CompletionClient,
{
    pub fn new(repository: Arc<MR>, completion_client: Arc<CC>) -> Self {
        Self {
            repository,
            completion_client,
        }
    }
}

#[async_trait]
impl<MR, CC> MessageServicePort for MessageService<MR, CC>
where
    MR: MessageRepository,
    CC: CompletionClient,
{
    async fn echo(&self, username: &str, text: UserText) -> Result<Message, MessageError> {
        let reply = self
            .completion_client
            .complete(text.as_str())
            .await
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Completion request failed");
                MessageError::from(e)
            })?;

        let message = self
            .repository
            .create(NewMessage::new(
                username.to_string(),
                text,
                reply,
                Utc::now(),
            ))
            .await?;

        tracing::info!(message_id = %message.id, username = %username, "Message relayed");

        Ok(message)
    }

    async fn list_messages(&self, username: &str) -> Result<Vec<Message>, MessageError> {
        self.repository.list_by_username(username).await
    }

    async fn get_message(&self, username: &str, id: MessageId) -> Result<Message, MessageError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|message| message.username == username)
            .ok_or(MessageError::NotFound(id.to_string()))
    }
}
