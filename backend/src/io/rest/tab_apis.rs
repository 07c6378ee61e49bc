use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use serde_json::Value;
use shared::TabValidationResponse;
use tracing::info;

use crate::domain::validate_tab;
use crate::io::rest::mappers::error_mapper::ErrorMapper;
use crate::AppState;

/// Create a router for tab related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validate))
}

/// Check a tab without splitting it, returning it in normalized form
pub async fn validate(Json(request): Json<Value>) -> impl IntoResponse {
    info!("POST /api/tab/validate - request: {:?}", request);

    match validate_tab(&request) {
        Ok(tab) => {
            let response = TabValidationResponse { valid: true, tab };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ErrorMapper::tab_validation_to_response(e),
    }
}
