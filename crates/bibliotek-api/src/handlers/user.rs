//! User account handlers. Listing, creation, and deletion are admin-only;
//! a member may read and update their own account.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use bibliotek_auth::rbac::policy::ResourceKind;
use bibliotek_core::error::AppError;
use bibliotek_core::types::pagination::PageResponse;
use bibliotek_entity::user::UserRole;
use bibliotek_entity::user::model::UpdateUser;

use crate::dto::request::{
    ChangePasswordRequest, CreateUserRequest, PageParams, UpdateUserRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageParams>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, ApiError> {
    state.policy.require_any(auth.role, &[UserRole::Admin])?;

    let page = page.to_page_request();
    let users = state.user_repo.find_all(&page).await?;

    let items: Vec<UserResponse> = users.items.iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(PageResponse::new(
        items,
        users.page,
        users.page_size,
        users.total_items,
    ))))
}

/// POST /api/users
///
/// Unlike self-registration, the administrator chooses the account's
/// role.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    state.policy.require_any(auth.role, &[UserRole::Admin])?;
    validate_request(&req)?;

    let user = state
        .credentials
        .create_account(
            &req.name,
            &req.surname,
            &req.email,
            &req.password,
            req.phone,
            req.address,
            req.role.unwrap_or(UserRole::User),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(&user))),
    ))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    state
        .policy
        .require_ownership(auth.role, ResourceKind::Users, auth.user_id, id)?;

    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    state
        .policy
        .require_ownership(auth.role, ResourceKind::Users, auth.user_id, id)?;

    // Role changes and unlocking are admin privileges even on one's own
    // account.
    if (req.role.is_some() || req.unlock.is_some()) && auth.role != UserRole::Admin {
        return Err(AppError::authorization(
            "Only administrators may change roles or unlock accounts",
        )
        .into());
    }

    let user = state
        .user_repo
        .update(
            id,
            &UpdateUser {
                name: req.name,
                surname: req.surname,
                phone: req.phone,
                address: req.address,
                role: req.role,
                unlock: req.unlock,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(UserResponse::from(&user))))
}

/// PUT /api/users/{id}/password
///
/// Self-service only: even admins must not set a password they know.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if auth.user_id != id {
        return Err(AppError::authorization("You may only change your own password").into());
    }
    validate_request(&req)?;

    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    state
        .credentials
        .validate(&user.email, &req.current_password)
        .await?;

    let hash = state.credentials.hash_password(&req.new_password)?;
    state.user_repo.update_password(id, &hash).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password updated",
    ))))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.policy.require_any(auth.role, &[UserRole::Admin])?;

    if auth.user_id == id {
        return Err(AppError::conflict("You cannot delete your own account").into());
    }

    // Invalidate every outstanding token before the row disappears.
    state.sessions.close_all(id).await?;

    if !state.user_repo.delete(id).await? {
        return Err(AppError::not_found(format!("User {id} not found")).into());
    }

    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
