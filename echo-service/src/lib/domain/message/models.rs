use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::message::errors::UserTextError;

/// One relayed exchange: the user's text and the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub username: String,
    pub user_text: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Render as `"<username>: <text> (Reply: <reply>)"`.
    pub fn formatted(&self) -> String {
        format!(
            "{}: {} (Reply: {})",
            self.username, self.user_text, self.reply
        )
    }
}

/// Message identifier type (store-assigned row id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Text submitted for relaying.
///
/// Must contain a non-whitespace character and at most 4000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserText(String);

impl UserText {
    const MAX_LENGTH: usize = 4000;

    pub fn new(text: String) -> Result<Self, UserTextError> {
        if text.trim().is_empty() {
            return Err(UserTextError::Empty);
        }

        let length = text.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(UserTextError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Message row about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub username: String,
    pub user_text: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(username: String, user_text: UserText, reply: String, now: DateTime<Utc>) -> Self {
        Self {
            username,
            user_text: user_text.into_inner(),
            reply,
            created_at: now,
            updated_at: now,
        }
    }
}
