//! Session token handling.
//!
//! The API issues a JWT on login. The client only reads the payload segment
//! to learn who is logged in; it never checks the signature.
//!
//! # Trust assumption
//!
//! Claims are trusted because the token came straight from the configured
//! API over the connection the login request used. The client makes no
//! authorization decision the server does not re-check: admin calls send the
//! token back as a bearer credential and the server verifies it there.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sweet_home_core::{Role, UserId};

/// Errors that can occur when reading token claims.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token does not have a `header.payload.signature` shape.
    #[error("token is not a three-part JWT")]
    Shape,

    /// The payload segment is not valid base64.
    #[error("token payload is not base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The payload is not the expected JSON object.
    #[error("token payload is not valid claims JSON: {0}")]
    Claims(#[from] serde_json::Error),
}

/// An opaque session token.
///
/// Implements `Debug` manually so the credential never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Read the claims embedded in the token (unverified).
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the payload segment cannot be decoded.
    pub fn claims(&self) -> Result<TokenClaims, TokenError> {
        decode_claims(&self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Claims the shop API puts in its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Account id.
    #[serde(deserialize_with = "subject_as_string")]
    pub sub: UserId,
    /// Account role; tokens without one belong to regular users.
    #[serde(default)]
    pub role: Role,
    /// Expiry as a Unix timestamp, if the server sets one.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issue time as a Unix timestamp, if the server sets one.
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Expiry as a UTC timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the expiry claim is in the past.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
///
/// Accepts both base64url (the JWT standard) and standard base64 alphabets,
/// with or without padding.
///
/// # Errors
///
/// Returns `TokenError` if the token is malformed.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(TokenError::Shape),
    };

    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn subject_as_string<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Text(String),
        Number(i64),
    }

    Ok(match Subject::deserialize(deserializer)? {
        Subject::Text(s) => UserId::new(s),
        Subject::Number(n) => UserId::new(n.to_string()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    /// Build an unsigned token around the given claims.
    pub(crate) fn token_with(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_subject_and_role() {
        let token = token_with(&serde_json::json!({"sub": "u-42", "role": "admin", "exp": 1_900_000_000}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, UserId::new("u-42"));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let token = token_with(&serde_json::json!({"sub": 7}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, UserId::new("7"));
        assert_eq!(claims.role, Role::User);
        assert!(claims.expires_at().is_none());
    }

    #[test]
    fn test_standard_alphabet_with_padding() {
        let payload = STANDARD.encode(br#"{"sub":"abc","role":"user"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode_claims(&token).unwrap().sub, UserId::new("abc"));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(decode_claims("opaque"), Err(TokenError::Shape)));
        assert!(matches!(decode_claims("a..c"), Err(TokenError::Shape)));
        assert!(matches!(decode_claims("a.b.c.d"), Err(TokenError::Shape)));
        assert!(matches!(decode_claims("a.!!!.c"), Err(TokenError::Encoding(_))));

        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            decode_claims(&format!("a.{not_json}.c")),
            Err(TokenError::Claims(_))
        ));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let token = token_with(&serde_json::json!({"sub": "x", "role": "owner"}));
        assert!(matches!(decode_claims(&token), Err(TokenError::Claims(_))));
    }

    #[test]
    fn test_expiry() {
        let token = token_with(&serde_json::json!({"sub": "x", "exp": 100}));
        let claims = decode_claims(&token).unwrap();
        let now = DateTime::from_timestamp(200, 0).unwrap();
        assert!(claims.is_expired_at(now));
        assert!(!claims.is_expired_at(DateTime::from_timestamp(50, 0).unwrap()));
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("secret.token.value");
        assert_eq!(format!("{token:?}"), "AuthToken([REDACTED])");
        assert_eq!(token.expose(), "secret.token.value");
    }
}
