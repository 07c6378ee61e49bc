use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::{ErrorResponse, ValidationErrorResponse};
use tracing::{error, warn};

use crate::domain::{TabCodecError, TabValidationError, ValidationErrors};

pub struct ErrorMapper;

impl ErrorMapper {
    /// Unreadable input becomes `400 { error }`, rule violations `400 { errors }`
    pub fn tab_validation_to_response(err: TabValidationError) -> Response {
        match err {
            TabValidationError::Malformed(reason) => {
                warn!("Rejected malformed tab: {}", reason);
                Self::bad_request(reason)
            }
            TabValidationError::Invalid(errors) => Self::validation_to_response(errors),
        }
    }

    pub fn validation_to_response(errors: ValidationErrors) -> Response {
        warn!("Rejected tab: {}", errors);
        let response = ValidationErrorResponse {
            errors: errors.into_issues(),
        };
        (StatusCode::BAD_REQUEST, Json(response)).into_response()
    }

    /// A link that cannot be decoded is the caller's problem; failing to
    /// build one is ours.
    pub fn codec_to_response(err: TabCodecError) -> Response {
        match err {
            TabCodecError::InvalidQuery(_)
            | TabCodecError::InvalidJson { .. }
            | TabCodecError::FragmentTooLarge { .. } => {
                warn!("Rejected share link: {}", err);
                Self::bad_request(err.to_string())
            }
            TabCodecError::Encode(_) | TabCodecError::Compression(_) => {
                error!("Failed to build share link: {}", err);
                Self::internal_error("Error creating share link")
            }
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Response {
        let response = ErrorResponse {
            error: message.into(),
        };
        (StatusCode::BAD_REQUEST, Json(response)).into_response()
    }

    pub fn internal_error(message: impl Into<String>) -> Response {
        let response = ErrorResponse {
            error: message.into(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
    }
}
