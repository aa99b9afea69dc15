//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An active per-device session.
///
/// A session is created on login, keyed by the access token's `jti`, and
/// closed on logout, expiry, or account-wide termination.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// The `jti` claim of the access token issued at login.
    pub token_jti: Uuid,
    /// The refresh token issued at login.
    #[serde(skip_serializing)]
    pub refresh_token: String,
    /// IP address from which the session was created.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Whether the session is open.
    pub active: bool,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

/// Data required to open a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// The `jti` of the issued access token.
    pub token_jti: Uuid,
    /// The issued refresh token.
    pub refresh_token: String,
    /// IP address of the client.
    pub ip_address: Option<String>,
    /// User-Agent header.
    pub user_agent: Option<String>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

/// A session as presented to its owner, without token material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: Uuid,
    /// IP address at login.
    pub ip_address: Option<String>,
    /// User agent at login.
    pub user_agent: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Whether this is the session making the request.
    pub current: bool,
}

impl SessionSummary {
    /// Build a summary from a session row, marking whether it belongs to
    /// the requesting token.
    pub fn from_session(session: &Session, current_jti: Uuid) -> Self {
        Self {
            id: session.id,
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            current: session.token_jti == current_jti,
        }
    }
}
