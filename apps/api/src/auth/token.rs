use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256 bearer tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies signature and expiry and returns the embedded user id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoded = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;

            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token verification failed: token expired");
                    TokenError::Expired
                }
                ErrorKind::InvalidSignature => {
                    tracing::warn!("Token verification failed: invalid signature");
                    TokenError::InvalidSignature
                }
                _ => {
                    tracing::warn!("Token verification failed: {e}");
                    TokenError::Malformed
                }
            }
        })?;

        decoded
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "FAKE_JWT_SECRET_DO_NOT_USE";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::hours(24))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = issuer();
        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.verify(&token), Ok(42));
    }

    #[test]
    fn test_expiry_is_ttl_after_issue() {
        let token = issuer().issue(7).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let claims = decode::<Claims>(&token, &DecodingKey::from_secret(b""), &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.sub, "7");
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = TokenIssuer::new(SECRET, Duration::seconds(-10));
        let token = expired.issue(1).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let other = TokenIssuer::new("some-other-secret", Duration::hours(24));
        let token = other.issue(1).unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let tokens = issuer();
        let token = tokens.issue(1).unwrap();
        let forged = tokens.issue(2).unwrap();
        // Splice user 2's payload onto user 1's signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert_eq!(tokens.verify(&spliced), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(issuer().verify("invalid.jwt.token"), Err(TokenError::Malformed));
        assert_eq!(issuer().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(issuer().verify(&token), Err(TokenError::Malformed));
    }
}
