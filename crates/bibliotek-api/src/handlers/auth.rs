//! Auth handlers: register, login, refresh, logout, sessions, me.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use bibliotek_core::error::AppError;
use bibliotek_entity::session::model::SessionSummary;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{
    ApiResponse, CountResponse, LoginResponse, MessageResponse, RefreshResponse, UserResponse,
};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    validate_request(&req)?;

    let user = state
        .credentials
        .register(
            &req.name,
            &req.surname,
            &req.email,
            &req.password,
            req.phone,
            req.address,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(&user))),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    validate_request(&req)?;

    let user = state.credentials.validate(&req.email, &req.password).await?;

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let tokens = state.sessions.open(&user, ip_address, user_agent).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_at: tokens.access_expires_at,
        refresh_expires_at: tokens.refresh_expires_at,
        user: UserResponse::from(&user),
    })))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    if req.refresh_token.is_empty() {
        return Err(AppError::validation("Refresh token is required").into());
    }

    let (access_token, access_expires_at) = state.sessions.refresh(&req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(RefreshResponse {
        access_token,
        access_expires_at,
    })))
}

/// POST /api/auth/logout
///
/// Tolerant: an expired or unreadable token still yields 200 so clients
/// can always clear local state.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.sessions.close(token).await?;
    }

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.sessions.close_all(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state
        .user_repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// GET /api/auth/sessions
pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, ApiError> {
    let sessions = state.sessions.list(auth.user_id, auth.jti).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}
