//! Payload validation helpers

use validator::Validate;

use super::AppError;

/// Run derive-based validation and convert failures into the API error.
pub fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}
