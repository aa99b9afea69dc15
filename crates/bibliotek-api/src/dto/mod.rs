//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use bibliotek_core::error::AppError;
use bibliotek_core::result::AppResult;

/// Runs derive-based validation and converts failures into a 400 with
/// per-field messages in the details.
pub fn validate_request<T: Validate>(req: &T) -> AppResult<()> {
    req.validate().map_err(|errors| {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();

        AppError::validation("Invalid request data").with_details(serde_json::json!(details))
    })
}
