//! Session lifecycle orchestration: login, refresh, logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use bibliotek_core::error::AppError;
use bibliotek_core::result::AppResult;
use bibliotek_database::repositories::{SessionRepository, UserRepository};
use bibliotek_entity::session::model::{CreateSession, SessionSummary};
use bibliotek_entity::user::User;

use crate::jwt::{IssuedTokens, TokenIssuer, TokenVerifier};
use crate::revocation::RevocationRegistry;

/// Orchestrates per-device sessions around token issuance.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<SessionRepository>,
    users: Arc<UserRepository>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    revocations: RevocationRegistry,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(
        sessions: Arc<SessionRepository>,
        users: Arc<UserRepository>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        revocations: RevocationRegistry,
    ) -> Self {
        Self {
            sessions,
            users,
            issuer,
            verifier,
            revocations,
        }
    }

    /// Opens a session for an already-validated user and returns the token
    /// pair. Each login creates an independent session, so one account can
    /// be signed in from several devices at once.
    pub async fn open(
        &self,
        user: &User,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<IssuedTokens> {
        let tokens = self.issuer.issue_pair(user)?;

        self.sessions
            .create(&CreateSession {
                user_id: user.id,
                token_jti: tokens.access_jti,
                refresh_token: tokens.refresh_token.clone(),
                ip_address,
                user_agent,
                expires_at: tokens.refresh_expires_at,
            })
            .await?;

        info!(user_id = %user.id, "Session opened");
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The refresh token must verify, belong to an open session, and its
    /// owner must still exist. Role and email are re-read from storage so
    /// a role change takes effect here. The refresh token itself is not
    /// rotated.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(String, DateTime<Utc>)> {
        let claims = self.verifier.verify_refresh_token(refresh_token)?;

        let session = self
            .sessions
            .find_active_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid or expired token"))?;

        if session.user_id != claims.sub {
            return Err(AppError::invalid_token("Invalid or expired token"));
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid or expired token"))?;

        let (access_token, jti, expires_at) = self.issuer.issue_access_token(&user, None)?;
        self.sessions.rotate_jti(session.id, jti).await?;

        debug!(user_id = %user.id, "Access token refreshed");
        Ok((access_token, expires_at))
    }

    /// Closes the session behind a presented access token and revokes it.
    ///
    /// Tolerant by design: the token is decoded without verification so an
    /// expired or tampered token still logs out cleanly. Unreadable tokens
    /// are a no-op.
    pub async fn close(&self, token: &str) -> AppResult<()> {
        let Some(claims) = self.verifier.decode_unsafe(token) else {
            return Ok(());
        };

        self.revocations
            .revoke(claims.jti, claims.sub, claims.expires_at())
            .await?;
        self.sessions.close_by_jti(claims.sub, claims.jti).await?;

        info!(user_id = %claims.sub, "Session closed");
        Ok(())
    }

    /// Closes every open session for a user and revokes each outstanding
    /// access token. Returns the number of sessions closed.
    pub async fn close_all(&self, user_id: Uuid) -> AppResult<u64> {
        let open = self.sessions.find_active_by_user(user_id).await?;
        for session in &open {
            self.revocations
                .revoke(session.token_jti, user_id, session.expires_at)
                .await?;
        }

        let closed = self.sessions.close_all_for_user(user_id).await?;
        info!(%user_id, closed, "All sessions closed");
        Ok(closed)
    }

    /// Lists a user's active sessions, marking the one that made the
    /// request.
    pub async fn list(&self, user_id: Uuid, current_jti: Uuid) -> AppResult<Vec<SessionSummary>> {
        let sessions = self.sessions.find_active_by_user(user_id).await?;
        Ok(sessions
            .iter()
            .map(|s| SessionSummary::from_session(s, current_jti))
            .collect())
    }
}
