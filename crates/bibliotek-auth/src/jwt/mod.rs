//! JWT issuance and verification.

use jsonwebtoken::Algorithm;

use bibliotek_core::error::AppError;

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use decoder::TokenVerifier;
pub use encoder::{IssuedTokens, TokenIssuer};

/// Resolves the configured signing algorithm name.
///
/// Only the HMAC family is accepted because both sides key off the same
/// shared secret.
pub(crate) fn signing_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::configuration(format!(
            "Unsupported JWT algorithm '{other}'; expected HS256, HS384, or HS512"
        ))),
    }
}
