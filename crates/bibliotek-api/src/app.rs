//! Application builder: wires repositories, services, and the router
//! into a running Axum server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{error, info};

use bibliotek_auth::credentials::CredentialService;
use bibliotek_auth::jwt::decoder::TokenVerifier;
use bibliotek_auth::jwt::encoder::TokenIssuer;
use bibliotek_auth::rate_limit::InMemoryCounter;
use bibliotek_auth::rbac::policy::AuthorizationPolicy;
use bibliotek_auth::revocation::RevocationRegistry;
use bibliotek_auth::session::cleanup::MaintenanceSweep;
use bibliotek_auth::session::manager::SessionManager;
use bibliotek_core::config::AppConfig;
use bibliotek_core::error::AppError;
use bibliotek_core::result::AppResult;
use bibliotek_database::repositories::{
    BookRepository, LoanRepository, RevocationRepository, SessionRepository, UserRepository,
};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state from configuration and a database pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppResult<AppState> {
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
    let revocation_repo = Arc::new(RevocationRepository::new(db_pool.clone()));
    let book_repo = Arc::new(BookRepository::new(db_pool.clone()));
    let loan_repo = Arc::new(LoanRepository::new(db_pool.clone()));

    let issuer = TokenIssuer::new(&config.auth)?;
    let verifier = TokenVerifier::new(&config.auth)?;
    let revocations = RevocationRegistry::new(
        Arc::clone(&revocation_repo),
        config.auth.revocation_check_enabled,
    );
    let credentials = Arc::new(CredentialService::new(Arc::clone(&user_repo), &config.auth)?);
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
        issuer,
        verifier.clone(),
        revocations.clone(),
    ));
    let rate_limiter = Arc::new(InMemoryCounter::new(&config.rate_limit));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        verifier: Arc::new(verifier),
        credentials,
        sessions,
        revocations,
        policy: AuthorizationPolicy::new(),
        rate_limiter,
        user_repo,
        session_repo,
        book_repo,
        loan_repo,
    })
}

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Bibliotek server with the given configuration and database
/// pool, including the periodic maintenance sweep.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> AppResult<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let sweep_interval = Duration::from_secs(config.auth.sweep_interval_seconds);

    let state = build_state(config, db_pool)?;

    let sweep = MaintenanceSweep::new(Arc::clone(&state.session_repo), state.revocations.clone());

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let sweep_task = {
        let sweep = sweep.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            interval.tick().await; // first tick is immediate
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = sweep.run().await {
                            error!(error = %e, "Maintenance sweep failed");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        })
    };

    let app = build_app(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Bibliotek server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // One last sweep so a restart does not inherit dead rows.
    let _ = sweep_task.await;
    if let Err(e) = sweep.run().await {
        error!(error = %e, "Final maintenance sweep failed");
    }

    info!("Server shut down gracefully");
    Ok(())
}

/// Completes on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
