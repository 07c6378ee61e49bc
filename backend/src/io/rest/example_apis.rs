use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use shared::ExampleTabResponse;
use tracing::info;

use crate::domain::{generate_example_tab, share_link};
use crate::io::rest::mappers::error_mapper::ErrorMapper;
use crate::io::rest::split_apis::checked_split;
use crate::AppState;

// Query parameters for the example tab API
#[derive(Debug, Deserialize)]
pub struct ExampleQuery {
    pub seed: Option<u64>,
}

/// Create a router for example tab APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_example))
}

/// Random example tab with its split; the same seed always gives the same tab
pub async fn get_example(
    State(state): State<AppState>,
    Query(query): Query<ExampleQuery>,
) -> impl IntoResponse {
    info!("GET /api/example - query: {:?}", query);

    let seed = query.seed.unwrap_or_else(rand::random::<u64>);
    let tab = generate_example_tab(&mut StdRng::seed_from_u64(seed));
    info!("Generated example '{}' from seed {}", tab.tab_name, seed);

    let split = match checked_split(&tab) {
        Ok(split) => split,
        Err(response) => return response,
    };

    match share_link(&state.config.base_url, &tab, state.config.link_style) {
        Ok(link) => (StatusCode::OK, Json(ExampleTabResponse { tab, split, link })).into_response(),
        Err(e) => ErrorMapper::codec_to_response(e),
    }
}
