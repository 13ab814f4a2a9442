use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;
use super::secret::SigningSecret;

/// Builds signed identity assertions.
///
/// Tokens are signed with HS256. The output depends only on the username,
/// the secret and the issue instant, so two calls with the same inputs
/// produce the same token.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: SigningSecret,
    algorithm: Algorithm,
}

impl TokenIssuer {
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            secret,
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for `username`, valid for 24 hours from `now`.
    ///
    /// # Errors
    /// * `Config(MissingSecret)` - No signing secret configured
    /// * `EmptySubject` - `username` is empty
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        let key = self.secret.expose()?;

        if username.is_empty() {
            return Err(JwtError::EmptySubject);
        }

        let claims = Claims::for_user(username, now);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &EncodingKey::from_secret(key))
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jwt::ConfigError;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_has_three_segments() {
        let issuer = TokenIssuer::new(SigningSecret::new("test_secret_key_at_least_32_bytes!"));

        let token = issuer.issue("alice", now()).expect("Failed to issue token");

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issue_is_deterministic() {
        let issuer = TokenIssuer::new(SigningSecret::new("test_secret_key_at_least_32_bytes!"));

        let first = issuer.issue("alice", now()).unwrap();
        let second = issuer.issue("alice", now()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_issue_depends_on_inputs() {
        let issuer = TokenIssuer::new(SigningSecret::new("test_secret_key_at_least_32_bytes!"));
        let other = TokenIssuer::new(SigningSecret::new("another_secret_key_at_least_32_b!"));

        let base = issuer.issue("alice", now()).unwrap();

        assert_ne!(base, issuer.issue("bob", now()).unwrap());
        assert_ne!(
            base,
            issuer
                .issue("alice", now() + chrono::Duration::seconds(1))
                .unwrap()
        );
        assert_ne!(base, other.issue("alice", now()).unwrap());
    }

    #[test]
    fn test_issue_without_secret() {
        let issuer = TokenIssuer::new(SigningSecret::new(""));

        let result = issuer.issue("alice", now());

        assert_eq!(result, Err(JwtError::Config(ConfigError::MissingSecret)));
    }

    #[test]
    fn test_issue_empty_username() {
        let issuer = TokenIssuer::new(SigningSecret::new("test_secret_key_at_least_32_bytes!"));

        assert_eq!(issuer.issue("", now()), Err(JwtError::EmptySubject));
    }
}
