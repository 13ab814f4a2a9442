//! Authentication core for the Echoes relay
//!
//! Provides:
//! - Password hashing (Argon2id)
//! - Stateless JWT issuance and validation (HS256, 24 hour lifetime)
//! - The access gate policy applied to protected requests
//!
//! The signing secret is always passed in by the caller; nothing here reads
//! the environment. All operations take the current time as an argument so
//! they can be exercised with a fixed clock.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{SigningSecret, TokenIssuer, TokenValidator};
//! use chrono::Utc;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!");
//! let now = Utc::now();
//!
//! let token = TokenIssuer::new(secret.clone()).issue("alice", now).unwrap();
//! let identity = TokenValidator::new(secret).validate(&token, now).unwrap();
//! assert_eq!(identity.subject, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Utc;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "alice", Utc::now()).unwrap();
//!
//! // Protected request: run the gate over the Authorization header
//! let header = format!("Bearer {}", result.access_token);
//! let identity = auth.admit(Some(header.as_bytes()), Utc::now()).unwrap();
//! assert_eq!(identity.subject, "alice");
//! ```

pub mod authenticator;
pub mod gate;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use gate::GateRejection;
pub use jwt::Claims;
pub use jwt::ConfigError;
pub use jwt::Identity;
pub use jwt::JwtError;
pub use jwt::SigningSecret;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
