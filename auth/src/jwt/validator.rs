use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::Claims;
use super::errors::JwtError;
use super::secret::SigningSecret;

/// Identity recovered from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for Identity {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        if claims.sub.is_empty() {
            return Err(JwtError::MalformedToken("empty subject".to_string()));
        }

        let issued_at = timestamp(claims.iat, "iat")?;
        let expires_at = timestamp(claims.exp, "exp")?;

        Ok(Self {
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, JwtError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| JwtError::MalformedToken(format!("{} out of range", claim)))
}

/// Only the declared algorithm is read before the signature is checked.
#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Verifies identity assertions produced by [`TokenIssuer`](super::TokenIssuer).
///
/// Validation runs in a fixed order, each step with its own failure:
/// 1. structure (`MalformedToken`)
/// 2. declared algorithm is HMAC (`InvalidSignature`)
/// 3. signature (`InvalidSignature`)
/// 4. expiry against the supplied clock (`TokenExpired`)
///
/// There is no revocation check: a correctly signed token is accepted until
/// its `exp`, whatever happened to the account in the meantime.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    secret: SigningSecret,
}

impl TokenValidator {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }

    /// Validate `token` at instant `now` and recover the identity it asserts.
    ///
    /// # Errors
    /// * `Config(MissingSecret)` - No signing secret configured
    /// * `MalformedToken` - Not a three-part token, or claims are missing
    /// * `InvalidSignature` - Non-HMAC algorithm or signature mismatch
    /// * `TokenExpired` - `now` is past the token's `exp`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, JwtError> {
        let key = self.secret.expose()?;

        let header = parse_structure(token)?;
        let algorithm = hmac_algorithm(&header.alg).ok_or(JwtError::InvalidSignature)?;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked below against the caller's clock, without leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
            .map_err(classify)?
            .claims;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Identity::try_from(claims)
    }
}

fn hmac_algorithm(declared: &str) -> Option<Algorithm> {
    match declared {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

fn parse_structure(token: &str) -> Result<DeclaredHeader, JwtError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let header = decode_segment(header, "header")?;
    let payload = decode_segment(payload, "payload")?;
    decode_segment(signature, "signature")?;

    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&payload)
        .map_err(|e| JwtError::MalformedToken(format!("payload: {}", e)))?;

    serde_json::from_slice(&header).map_err(|e| JwtError::MalformedToken(format!("header: {}", e)))
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, JwtError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| JwtError::MalformedToken(format!("{}: {}", name, e)))
}

fn classify(error: jsonwebtoken::errors::Error) -> JwtError {
    match error.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::MalformedToken(error.to_string()),
    }
}
