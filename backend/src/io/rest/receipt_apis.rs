use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use shared::PartialTab;
use tracing::info;

use crate::domain::complete_partial_tab;
use crate::AppState;

/// Create a router for receipt related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/prefill", post(prefill))
}

/// Turn extracted receipt data into a tab form with nobody assigned yet
pub async fn prefill(Json(request): Json<PartialTab>) -> impl IntoResponse {
    info!("POST /api/receipt/prefill - request: {:?}", request);

    let tab = complete_partial_tab(request);
    info!("Prefilled '{}' with {} items", tab.tab_name, tab.items.len());
    (StatusCode::OK, Json(tab)).into_response()
}
