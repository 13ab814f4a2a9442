use chrono::DateTime;
use chrono::Utc;

use crate::gate;
use crate::gate::GateRejection;
use crate::jwt::Identity;
use crate::jwt::JwtError;
use crate::jwt::SigningSecret;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// The signing secret is injected once at construction and shared read-only
/// by the issuer and the validator.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
    signing_secret_configured: bool,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing. An empty secret is
    ///   accepted here and reported by every token operation instead.
    pub fn new(jwt_secret: &[u8]) -> Self {
        let secret = SigningSecret::new(jwt_secret);

        Self {
            password_hasher: PasswordHasher::new(),
            signing_secret_configured: !secret.is_missing(),
            token_issuer: TokenIssuer::new(secret.clone()),
            token_validator: TokenValidator::new(secret),
        }
    }

    /// Whether a non-empty signing secret was supplied.
    pub fn has_signing_secret(&self) -> bool {
        self.signing_secret_configured
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token for `username`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `username` - Subject of the issued token
    /// * `now` - Issue instant
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or hash is unusable)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(username, now)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, username: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        self.token_issuer.issue(username, now)
    }

    /// Validate a token and recover its identity.
    ///
    /// # Errors
    /// * `JwtError` - Token validation failed
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, JwtError> {
        self.token_validator.validate(token, now)
    }

    /// Run the access gate over a raw `Authorization` header value.
    ///
    /// # Errors
    /// * `GateRejection` - Header missing, wrong scheme, or token rejected
    pub fn admit(
        &self,
        authorization: Option<&[u8]>,
        now: DateTime<Utc>,
    ) -> Result<Identity, GateRejection> {
        gate::admit(&self.token_validator, authorization, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");
        let now = Utc::now();

        let hash = authenticator
            .hash_password("secret1")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("secret1", &hash, "alice", now)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let identity = authenticator
            .validate_token(&result.access_token, now)
            .expect("Token validation failed");
        assert_eq!(identity.subject, "alice");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let hash = authenticator
            .hash_password("secret1")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrongpass", &hash, "alice", Utc::now());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let result = authenticator.authenticate("secret1", "not-a-hash", "alice", Utc::now());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_without_secret() {
        let authenticator = Authenticator::new(b"");
        assert!(!authenticator.has_signing_secret());

        let hash = authenticator
            .hash_password("secret1")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("secret1", &hash, "alice", Utc::now());
        assert!(matches!(
            result,
            Err(AuthenticationError::JwtError(JwtError::Config(_)))
        ));
    }

    #[test]
    fn test_token_expires_after_a_day() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");
        let now = Utc::now();

        let token = authenticator.issue_token("alice", now).unwrap();

        assert!(authenticator
            .validate_token(&token, now + Duration::hours(23))
            .is_ok());
        assert_eq!(
            authenticator.validate_token(&token, now + Duration::hours(25)),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let result = authenticator.validate_token("invalid.token.here", Utc::now());
        assert!(result.is_err());
    }
}
