//! # bibliotek-api
//!
//! HTTP API layer for Bibliotek: routing, extractors, request/response
//! DTOs, and handlers. All routes are mounted under `/api`.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::ApiError;
pub use state::AppState;
