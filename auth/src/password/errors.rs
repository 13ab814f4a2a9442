use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a malformed stored hash is
/// reported the same way as a wrong password.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
