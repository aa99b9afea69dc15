//! JWT claims structures used in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bibliotek_entity::user::UserRole;

/// Claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// Email for convenience.
    pub email: String,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// JWT ID for revocation tracking.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type discriminant, always `Access`.
    pub token_type: TokenType,
}

/// Claims payload embedded in every refresh token.
///
/// Deliberately minimal: role and email are re-read from storage on
/// refresh so a demotion takes effect on the next access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// JWT ID.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type discriminant, always `Refresh`.
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Access token for API requests.
    Access,
    /// Refresh token for obtaining new access tokens.
    Refresh,
}

impl AccessClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
