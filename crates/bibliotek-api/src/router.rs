//! Route definitions for the Bibliotek HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(book_routes())
        .merge(loan_routes())
        .merge(user_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, sessions, me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/sessions", get(handlers::auth::sessions))
}

/// Catalog endpoints. Reads are public.
fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(handlers::book::list))
        .route("/books", post(handlers::book::create))
        .route("/books/{id}", get(handlers::book::get))
        .route("/books/{id}", put(handlers::book::update))
        .route("/books/{id}", delete(handlers::book::delete))
}

/// Loan endpoints. All require authentication.
fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(handlers::loan::list))
        .route("/loans", post(handlers::loan::create))
        .route("/loans/stats", get(handlers::loan::stats))
        .route("/loans/{id}", get(handlers::loan::get))
        .route("/loans/{id}/return", put(handlers::loan::mark_returned))
        .route("/loans/{id}", delete(handlers::loan::delete))
}

/// User account endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list))
        .route("/users", post(handlers::user::create))
        .route("/users/{id}", get(handlers::user::get))
        .route("/users/{id}", put(handlers::user::update))
        .route("/users/{id}/password", put(handlers::user::change_password))
        .route("/users/{id}", delete(handlers::user::delete))
}

/// Health check endpoint (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
