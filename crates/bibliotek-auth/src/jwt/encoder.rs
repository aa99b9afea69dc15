//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use bibliotek_core::config::auth::AuthConfig;
use bibliotek_core::error::AppError;
use bibliotek_entity::user::User;

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::signing_algorithm;

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Header carrying the configured signing algorithm.
    header: Header,
    /// Access token TTL in hours.
    access_ttl_hours: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl_hours", &self.access_ttl_hours)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    /// Access token for API requests.
    pub access_token: String,
    /// The access token's jti, used as the session key.
    pub access_jti: Uuid,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(signing_algorithm(&config.jwt_algorithm)?),
            access_ttl_hours: config.jwt_access_ttl_hours as i64,
            refresh_ttl_days: config.jwt_refresh_ttl_days as i64,
        })
    }

    /// Generates a new access + refresh token pair for the given user.
    pub fn issue_pair(&self, user: &User) -> Result<IssuedTokens, AppError> {
        let now = Utc::now();
        let access_exp = now + chrono::Duration::hours(self.access_ttl_hours);
        let refresh_exp = now + chrono::Duration::days(self.refresh_ttl_days);
        let access_jti = Uuid::new_v4();

        let access_claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            jti: access_jti,
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            token_type: TokenType::Access,
        };

        let refresh_claims = RefreshClaims {
            sub: user.id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            token_type: TokenType::Refresh,
        };

        let access_token = encode(&self.header, &access_claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        let refresh_token = encode(&self.header, &refresh_claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok(IssuedTokens {
            access_token,
            access_jti,
            refresh_token,
            access_expires_at: access_exp,
            refresh_expires_at: refresh_exp,
        })
    }

    /// Generates a standalone access token (used by refresh).
    ///
    /// The TTL override replaces the configured access TTL for this one
    /// token.
    pub fn issue_access_token(
        &self,
        user: &User,
        ttl_override: Option<chrono::Duration>,
    ) -> Result<(String, Uuid, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let ttl = ttl_override.unwrap_or_else(|| chrono::Duration::hours(self.access_ttl_hours));
        let exp = now + ttl;
        let jti = Uuid::new_v4();

        let claims = AccessClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            jti,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Access,
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, jti, exp))
    }
}
