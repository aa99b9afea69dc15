//! `AuthUser` extractor: pulls the JWT from the Authorization header,
//! verifies it, checks revocation, and enforces the per-account rate limit.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use bibliotek_core::error::AppError;
use bibliotek_entity::user::UserRole;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller identity available in handlers.
///
/// Identity comes from the verified claims; no user row is loaded here.
/// A role change therefore takes effect on the next issued token, not
/// mid-token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's user ID.
    pub user_id: Uuid,
    /// Email from the token claims.
    pub email: String,
    /// Role at token issuance.
    pub role: UserRole,
    /// The access token's jti.
    pub jti: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError(AppError::authentication("Access token required")))?;

        // Signature, expiry, and token type. Failures are deliberately
        // indistinguishable from one another.
        let claims = state.verifier.verify_access_token(token)?;

        if state.revocations.is_revoked(claims.jti).await? {
            return Err(ApiError(AppError::authentication("Invalid token")));
        }

        if state.config.rate_limit.enabled
            && !state.rate_limiter.check_and_record(claims.sub).await?
        {
            return Err(ApiError(AppError::rate_limited(
                "Too many requests, please try again later",
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            jti: claims.jti,
        })
    }
}

/// Pull the bearer token out of the Authorization header, if any.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}
