use async_trait::async_trait;

use crate::message::errors::CompletionError;
use crate::message::errors::MessageError;
use crate::message::models::Message;
use crate::message::models::MessageId;
use crate::message::models::NewMessage;
use crate::message::models::UserText;

/// Port for the relay and history operations.
#[async_trait]
pub trait MessageServicePort: Send + Sync + 'static {
    /// Forward `text` to the completion API and record the exchange.
    ///
    /// Nothing is stored when the completion call fails.
    ///
    /// # Errors
    /// * `Completion` - The completion API call failed
    /// * `DatabaseError` - Database operation failed
    async fn echo(&self, username: &str, text: UserText) -> Result<Message, MessageError>;

    /// List the user's messages, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_messages(&self, username: &str) -> Result<Vec<Message>, MessageError>;

    /// Retrieve one of the user's messages.
    ///
    /// # Errors
    /// * `NotFound` - No such message, or it belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn get_message(&self, username: &str, id: MessageId) -> Result<Message, MessageError>;
}

/// Persistence operations for relayed messages.
#[async_trait]
pub trait MessageRepository: Send + Sync + 'static {
    async fn create(&self, message: NewMessage) -> Result<Message, MessageError>;

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, MessageError>;

    /// Newest first.
    async fn list_by_username(&self, username: &str) -> Result<Vec<Message>, MessageError>;
}

/// External language-model endpoint.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Send a single user message and return the first reply.
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError>;
}
