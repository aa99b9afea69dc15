//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use bibliotek_auth::credentials::CredentialService;
use bibliotek_auth::jwt::decoder::TokenVerifier;
use bibliotek_auth::rate_limit::RequestCounter;
use bibliotek_auth::rbac::policy::AuthorizationPolicy;
use bibliotek_auth::revocation::RevocationRegistry;
use bibliotek_auth::session::manager::SessionManager;
use bibliotek_core::config::AppConfig;
use bibliotek_database::repositories::{
    BookRepository, LoanRepository, SessionRepository, UserRepository,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Credential validation and lockout.
    pub credentials: Arc<CredentialService>,
    /// Session lifecycle manager.
    pub sessions: Arc<SessionManager>,
    /// Token denylist.
    pub revocations: RevocationRegistry,
    /// Role and ownership policy.
    pub policy: AuthorizationPolicy,
    /// Per-account request counter.
    pub rate_limiter: Arc<dyn RequestCounter>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository.
    pub user_repo: Arc<UserRepository>,
    /// Session repository.
    pub session_repo: Arc<SessionRepository>,
    /// Book repository.
    pub book_repo: Arc<BookRepository>,
    /// Loan repository.
    pub loan_repo: Arc<LoanRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
