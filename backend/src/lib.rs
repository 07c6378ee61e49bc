//! # Tab Splitter Backend
//!
//! Splits a shared restaurant bill: each person pays for their equal share of
//! the items they had, plus tax and tip in proportion to that subtotal.
//!
//! The domain layer is pure and synchronous; the `io` layer exposes it over a
//! small axum REST API and the binary in `main.rs` serves it.

use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod config;
pub mod domain;
pub mod io;

use config::ServerConfig;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    info!(
        "Setting up routes (CORS origin {:?}, {:?} share links)",
        app_state.config.cors_origin, app_state.config.link_style
    );

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/split", io::rest::split_apis::router())
        .nest("/tab", io::rest::tab_apis::router())
        .nest("/example", io::rest::example_apis::router())
        .nest("/receipt", io::rest::receipt_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
