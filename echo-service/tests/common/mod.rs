use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use echo_service::domain::message::service::MessageService;
use echo_service::domain::user::service::UserService;
use echo_service::inbound::http::router::create_router;
use echo_service::message::errors::CompletionError;
use echo_service::message::ports::CompletionClient;
use echo_service::outbound::repositories::SqliteMessageRepository;
use echo_service::outbound::repositories::SqliteUserRepository;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Text that makes the stub completion client fail.
pub const FAILING_TEXT: &str = "please fail";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

/// Completion client answering without network access.
pub struct StubCompletionClient;

#[async_trait]
impl CompletionClient for StubCompletionClient {
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError> {
        if user_text == FAILING_TEXT {
            return Err(CompletionError::UnexpectedStatus(503));
        }
        Ok(format!("You said: {}", user_text))
    }
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_secret(TEST_SECRET).await
    }

    /// Spawn with a specific signing secret; an empty one simulates a missing configuration.
    pub async fn spawn_with_secret(secret: &[u8]) -> Self {
        let pool = test_pool().await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(secret));

        let user_service = Arc::new(UserService::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::clone(&authenticator),
        ));
        let message_service = Arc::new(MessageService::new(
            Arc::new(SqliteMessageRepository::new(pool.clone())),
            Arc::new(StubCompletionClient),
        ));

        let router = create_router(user_service, message_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            pool,
            api_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a user and assert it was created
    pub async fn register(&self, username: &str, password: &str) {
        let response = self
            .post("/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Register a user, log in, and return the token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;

        let response = self
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Number of stored message rows
    pub async fn message_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count messages")
    }
}

/// Private in-memory database; a single connection that is never recycled keeps it alive.
async fn test_pool() -> SqlitePool {
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
