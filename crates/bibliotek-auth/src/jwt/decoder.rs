//! JWT token verification and tolerant decoding.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{DecodingKey, Validation, decode};

use bibliotek_core::config::auth::AuthConfig;
use bibliotek_core::error::AppError;

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::signing_algorithm;

/// Verifies JWT tokens against the signing secret.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(signing_algorithm(&config.jwt_algorithm)?);
        validation.validate_exp = true;
        validation.leeway = config.jwt_leeway_seconds;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Verifies an access token: signature, expiry, and token type.
    ///
    /// Every failure collapses into the same coarse error so callers
    /// cannot distinguish a bad signature from an expired token.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::invalid_token("Invalid or expired token"))?;

        if data.claims.token_type != TokenType::Access {
            return Err(AppError::invalid_token("Invalid or expired token"));
        }

        Ok(data.claims)
    }

    /// Verifies a refresh token: signature, expiry, and token type.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let data = decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::invalid_token("Invalid or expired token"))?;

        if data.claims.token_type != TokenType::Refresh {
            return Err(AppError::invalid_token("Invalid or expired token"));
        }

        Ok(data.claims)
    }

    /// Decodes an access token's payload without verifying signature or
    /// expiry.
    ///
    /// Only logout uses this: an expired token must still identify which
    /// session to close. Never trust these claims for authentication.
    pub fn decode_unsafe(&self, token: &str) -> Option<AccessClaims> {
        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
