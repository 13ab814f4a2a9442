use std::sync::Arc;

use auth::Authenticator;
use echo_service::config::Config;
use echo_service::domain::message::service::MessageService;
use echo_service::domain::user::service::UserService;
use echo_service::inbound::http::router::create_router;
use echo_service::outbound::completion::OpenAiCompletionClient;
use echo_service::outbound::repositories::SqliteMessageRepository;
use echo_service::outbound::repositories::SqliteUserRepository;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echo_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "echo-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        completion_url = %config.completion.api_url,
        completion_model = %config.completion.model,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    if !authenticator.has_signing_secret() {
        tracing::error!(
            "JWT__SECRET is not set: registration works but every login and protected request will fail"
        );
    }
    if config.completion.api_key.is_empty() {
        tracing::warn!("COMPLETION__API_KEY is not set: /api/echo will answer 502");
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "sqlite",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let message_repository = Arc::new(SqliteMessageRepository::new(pool));
    let completion_client = Arc::new(OpenAiCompletionClient::new(&config.completion)?);

    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));
    let message_service = Arc::new(MessageService::new(message_repository, completion_client));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, message_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
    }

    Ok(())
}
