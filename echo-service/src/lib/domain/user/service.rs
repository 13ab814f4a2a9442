use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::PasswordError;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for registration and login.
///
/// Password hashing and verification are CPU heavy and run on the blocking
/// thread pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer sharing the signing secret
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;

        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.as_str()))
                .await
                .map_err(|e| UserError::Unknown(e.to_string()))?
                .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<String, UserError> {
        let Some(user) = self.repository.find_by_username(&command.username).await? else {
            tracing::debug!(username = %command.username, "Login for unknown username");
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let stored_hash = user.password_hash;
        let username = user.username.to_string();
        let now = Utc::now();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &username, now)
        })
        .await
        .map_err(|e| UserError::Unknown(e.to_string()))?;

        match result {
            Ok(authentication) => {
                tracing::info!(username = %user.username, "User logged in");
                Ok(authentication.access_token)
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(username = %user.username, "Password mismatch");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(error = %e, "Failed to issue token");
                Err(UserError::Token(e.to_string()))
            }
        }
    }
}
