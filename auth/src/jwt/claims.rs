use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Issuer written into every token.
pub const ISSUER: &str = "echoes";

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Registered JWT claims carried by an identity assertion.
///
/// Exactly `iss`, `sub`, `iat` and `exp`; no custom claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for [`TOKEN_LIFETIME_HOURS`] from `now`.
    ///
    /// # Arguments
    /// * `username` - Subject of the token
    /// * `now` - Issue instant
    pub fn for_user(username: impl ToString, now: DateTime<Utc>) -> Self {
        let expiration = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            iss: ISSUER.to_string(),
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at the exact second of `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_for_user() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let claims = Claims::for_user("alice", now);

        assert_eq!(claims.iss, "echoes");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_serializes_registered_claims_only() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let value = serde_json::to_value(Claims::for_user("alice", now)).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["exp", "iat", "iss", "sub"]);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: "alice".to_string(),
            iat: 0,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }
}
