//! Catalog handlers. Reads are public; writes need librarian or admin,
//! except deletion which is admin-only.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use bibliotek_core::error::AppError;
use bibliotek_core::types::pagination::PageResponse;
use bibliotek_entity::book::model::{Book, CreateBook, UpdateBook};
use bibliotek_entity::user::UserRole;

use crate::dto::request::{BookQuery, CreateBookRequest, UpdateBookRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

const CATALOG_WRITERS: &[UserRole] = &[UserRole::Librarian, UserRole::Admin];

/// GET /api/books
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<ApiResponse<PageResponse<Book>>>, ApiError> {
    let page = query.page.to_page_request();
    let books = state
        .book_repo
        .find_all(query.search.as_deref(), &page)
        .await?;

    Ok(Json(ApiResponse::ok(books)))
}

/// GET /api/books/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))?;

    Ok(Json(ApiResponse::ok(book)))
}

/// POST /api/books
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookRequest>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    state.policy.require_any(auth.role, CATALOG_WRITERS)?;
    validate_request(&req)?;

    let book = state
        .book_repo
        .create(&CreateBook {
            title: req.title,
            author: req.author,
            isbn: req.isbn,
            publication_year: req.publication_year,
            genre: req.genre,
            publisher: req.publisher,
            total_copies: req.total_copies,
            description: req.description,
        })
        .await?;

    Ok(Json(ApiResponse::ok(book)))
}

/// PUT /api/books/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    state.policy.require_any(auth.role, CATALOG_WRITERS)?;

    if let Some(copies) = req.total_copies {
        if copies < 1 {
            return Err(AppError::validation("At least one copy is required").into());
        }
    }

    let book = state
        .book_repo
        .update(
            id,
            &UpdateBook {
                title: req.title,
                author: req.author,
                isbn: req.isbn,
                publication_year: req.publication_year,
                genre: req.genre,
                publisher: req.publisher,
                total_copies: req.total_copies,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(book)))
}

/// DELETE /api/books/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.policy.require_any(auth.role, &[UserRole::Admin])?;

    if !state.book_repo.delete(id).await? {
        return Err(AppError::not_found(format!("Book {id} not found")).into());
    }

    Ok(Json(ApiResponse::ok(MessageResponse::new("Book deleted"))))
}
