//! JWT token-pair handling
//!
//! Every login issues an access/refresh pair. Both tokens carry a unique
//! `jti` so individual tokens can be revoked through the blacklist table
//! without touching the rest of a user's sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token lifetime in hours
    pub access_expire_hours: i64,
    /// Refresh token lifetime in hours
    pub refresh_expire_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret-key-change-in-production".to_string(),
            access_expire_hours: 24,
            refresh_expire_hours: 24 * 7,
            issuer: "enerlytics".to_string(),
        }
    }
}

/// Which half of the token pair a set of claims belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Token kind (access or refresh)
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Unique token ID, referenced by the revocation blacklist
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    fn new(user_id: &str, kind: TokenKind, expire_hours: i64, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expire_hours);

        Self {
            sub: user_id.to_string(),
            kind,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// A freshly signed token together with its metadata
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Access + refresh pair returned by login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub access_expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

fn create_token(
    user_id: &str,
    kind: TokenKind,
    expire_hours: i64,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, kind, expire_hours, config);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedToken {
        token,
        jti: claims.jti,
        expires_in: expire_hours * 3600,
    })
}

/// Create an access token for a user
pub fn create_access_token(
    user_id: &str,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    create_token(user_id, TokenKind::Access, config.access_expire_hours, config)
}

/// Create a refresh token for a user
pub fn create_refresh_token(
    user_id: &str,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        TokenKind::Refresh,
        config.refresh_expire_hours,
        config,
    )
}

/// Create both halves of the token pair
pub fn create_token_pair(
    user_id: &str,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let access = create_access_token(user_id, config)?;
    let refresh = create_refresh_token(user_id, config)?;

    Ok(TokenPair {
        access_token: access.token,
        refresh_token: refresh.token,
        token_type: "bearer".to_string(),
        access_expires_in: access.expires_in,
        refresh_expires_in: refresh.expires_in,
    })
}

/// Errors from decoding or checking a token
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("could not validate token")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("expected a {expected} token")]
    WrongKind { expected: TokenKind },
}

/// Verify a token's signature, issuer, expiry and kind
pub fn verify_token(token: &str, kind: TokenKind, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.kind != kind {
        return Err(TokenError::WrongKind { expected: kind });
    }

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_pair() {
        let config = JwtConfig::default();
        let pair = create_token_pair("user-123", &config).unwrap();

        let access = verify_token(&pair.access_token, TokenKind::Access, &config).unwrap();
        assert_eq!(access.sub, "user-123");
        assert_eq!(access.kind, TokenKind::Access);
        assert!(!access.is_expired());

        let refresh = verify_token(&pair.refresh_token, TokenKind::Refresh, &config).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let config = JwtConfig::default();
        let pair = create_token_pair("user-123", &config).unwrap();

        let result = verify_token(&pair.refresh_token, TokenKind::Access, &config);
        assert!(matches!(result, Err(TokenError::WrongKind { .. })));
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::default();
        let result = verify_token("invalid-token", TokenKind::Access, &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = JwtConfig::default();
        let pair = create_token_pair("user-123", &config).unwrap();

        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            ..JwtConfig::default()
        };
        assert!(verify_token(&pair.access_token, TokenKind::Access, &other).is_err());
    }
}
