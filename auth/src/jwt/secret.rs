use std::fmt;

use thiserror::Error;

/// Configuration errors surfaced by token operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("JWT signing secret is not configured")]
    MissingSecret,
}

/// Shared symmetric key used to sign and verify tokens.
///
/// An empty secret can be constructed so that a process without one can
/// still start; every issue or validate call then fails with
/// `ConfigError::MissingSecret`.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the key bytes.
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn expose(&self) -> Result<&[u8], ConfigError> {
        if self.is_missing() {
            Err(ConfigError::MissingSecret)
        } else {
            Ok(&self.0)
        }
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&if self.is_missing() { "<missing>" } else { "<redacted>" })
            .finish()
    }
}
