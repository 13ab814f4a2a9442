use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::SqlitePool;

use crate::message::errors::MessageError;
use crate::message::models::Message;
use crate::message::models::MessageId;
use crate::message::models::NewMessage;
use crate::message::ports::MessageRepository;

pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: i64,
    username: String,
    user_text: String,
    reply: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: MessageId(row.id),
            username: row.username,
            user_text: row.user_text,
            reply: row.reply,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: NewMessage) -> Result<Message, MessageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (username, user_text, reply, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&message.username)
        .bind(&message.user_text)
        .bind(&message.reply)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        Ok(Message {
            id: MessageId(result.last_insert_rowid()),
            username: message.username,
            user_text: message.user_text,
            reply: message.reply,
            created_at: message.created_at,
            updated_at: message.updated_at,
        })
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, MessageError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, username, user_text, reply, created_at, updated_at
            FROM messages
            WHERE id = ?1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        Ok(row.map(Message::from))
    }

    async fn list_by_username(&self, username: &str) -> Result<Vec<Message>, MessageError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, username, user_text, reply, created_at, updated_at
            FROM messages
            WHERE username = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Message::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::message::models::UserText;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn new_message(username: &str, text: &str, now: DateTime<Utc>) -> NewMessage {
        NewMessage::new(
            username.to_string(),
            UserText::new(text.to_string()).unwrap(),
            format!("reply to {}", text),
            now,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = SqliteMessageRepository::new(memory_pool().await);
        let now = Utc::now();

        let created = repository
            .create(new_message("alice", "hello", now))
            .await
            .unwrap();
        let found = repository
            .find_by_id(created.id)
            .await
            .unwrap()
            .expect("Message not found");

        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");
        assert_eq!(found.user_text, "hello");
        assert_eq!(found.reply, "reply to hello");
        assert_eq!(repository.find_by_id(MessageId(999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_by_username_newest_first() {
        let repository = SqliteMessageRepository::new(memory_pool().await);
        let now = Utc::now();

        repository
            .create(new_message("alice", "first", now - Duration::seconds(10)))
            .await
            .unwrap();
        repository
            .create(new_message("bob", "other", now))
            .await
            .unwrap();
        repository
            .create(new_message("alice", "second", now))
            .await
            .unwrap();

        let messages = repository.list_by_username("alice").await.unwrap();

        let texts: Vec<_> = messages.iter().map(|m| m.user_text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }
}
