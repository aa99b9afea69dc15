//! Loan handlers. Regular members see only their own loans; the filter is
//! applied implicitly rather than returning a 403.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{Duration, Utc};
use uuid::Uuid;

use bibliotek_auth::rbac::policy::{ResourceAccess, ResourceKind};
use bibliotek_core::error::AppError;
use bibliotek_core::types::pagination::PageResponse;
use bibliotek_entity::loan::model::{CreateLoan, Loan, LoanStats};
use bibliotek_entity::user::UserRole;

use crate::dto::request::{CreateLoanRequest, LoanQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Default loan length when the request does not set a due date.
const DEFAULT_LOAN_DAYS: i64 = 30;

/// GET /api/loans
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LoanQuery>,
) -> Result<Json<ApiResponse<PageResponse<Loan>>>, ApiError> {
    let access = state.policy.resource_access(auth.role, ResourceKind::Loans)?;
    let user_filter = match access {
        ResourceAccess::Full => None,
        ResourceAccess::OwnOnly => Some(auth.user_id),
    };

    let page = query.page.to_page_request();
    let loans = state
        .loan_repo
        .find_all(user_filter, query.status, &page)
        .await?;

    Ok(Json(ApiResponse::ok(loans)))
}

/// GET /api/loans/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<LoanStats>>, ApiError> {
    state
        .policy
        .require_any(auth.role, &[UserRole::Librarian, UserRole::Admin])?;

    let stats = state.loan_repo.stats().await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/loans/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Loan>>, ApiError> {
    let loan = state
        .loan_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Loan {id} not found")))?;

    state
        .policy
        .require_ownership(auth.role, ResourceKind::Loans, auth.user_id, loan.user_id)?;

    Ok(Json(ApiResponse::ok(loan)))
}

/// POST /api/loans
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateLoanRequest>,
) -> Result<Json<ApiResponse<Loan>>, ApiError> {
    // Members borrow for themselves; staff may borrow on behalf of anyone.
    let borrower = req.user_id.unwrap_or(auth.user_id);
    state
        .policy
        .require_ownership(auth.role, ResourceKind::Loans, auth.user_id, borrower)?;

    let book = state
        .book_repo
        .find_by_id(req.book_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {} not found", req.book_id)))?;

    if !book.is_available() {
        return Err(AppError::conflict("No copies of this book are available").into());
    }

    // Conditional decrement: loses the race cleanly when the last copy
    // goes to a concurrent request.
    if !state.book_repo.take_copy(book.id).await? {
        return Err(AppError::conflict("No copies of this book are available").into());
    }

    let due_at = req
        .due_at
        .unwrap_or_else(|| Utc::now() + Duration::days(DEFAULT_LOAN_DAYS));
    if due_at <= Utc::now() {
        state.book_repo.return_copy(book.id).await?;
        return Err(AppError::validation("Due date must be in the future").into());
    }

    let loan = match state
        .loan_repo
        .create(&CreateLoan {
            user_id: borrower,
            book_id: book.id,
            due_at,
            notes: req.notes,
        })
        .await
    {
        Ok(loan) => loan,
        Err(e) => {
            // Put the copy back so a failed insert cannot leak availability.
            state.book_repo.return_copy(book.id).await?;
            return Err(e.into());
        }
    };

    Ok(Json(ApiResponse::ok(loan)))
}

/// PUT /api/loans/{id}/return
pub async fn mark_returned(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Loan>>, ApiError> {
    let loan = state
        .loan_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Loan {id} not found")))?;

    state
        .policy
        .require_ownership(auth.role, ResourceKind::Loans, auth.user_id, loan.user_id)?;

    let returned = state
        .loan_repo
        .mark_returned(id)
        .await?
        .ok_or_else(|| AppError::conflict("Loan has already been returned"))?;

    state.book_repo.return_copy(returned.book_id).await?;

    Ok(Json(ApiResponse::ok(returned)))
}

/// DELETE /api/loans/{id}
///
/// Only returned loans can be deleted, and only by an administrator.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.policy.require_any(auth.role, &[UserRole::Admin])?;

    let loan = state
        .loan_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Loan {id} not found")))?;

    if !state.loan_repo.delete_returned(loan.id).await? {
        return Err(AppError::conflict("Only returned loans can be deleted").into());
    }

    Ok(Json(ApiResponse::ok(MessageResponse::new("Loan deleted"))))
}
