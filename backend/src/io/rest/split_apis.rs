//! # REST API for Splitting Tabs
//!
//! `POST /api/split` splits a tab and hands back a share link;
//! `GET /api/split/load` recomputes the split from such a link.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use shared::{LoadSplitResponse, Split, SplitResponse, Tab};
use tracing::{error, info};

use crate::domain::{
    calculate_split, decode_fragment, payment_link, share_link, validate_split, validate_tab,
};
use crate::io::rest::mappers::error_mapper::ErrorMapper;
use crate::AppState;

/// Create a router for split related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_split))
        .route("/load", get(load_split))
}

/// Split a tab and return it with a link that reproduces it
pub async fn create_split(
    State(state): State<AppState>,
    Json(request): Json<Value>,
) -> impl IntoResponse {
    info!("POST /api/split - request: {:?}", request);

    let tab = match validate_tab(&request) {
        Ok(tab) => tab,
        Err(e) => return ErrorMapper::tab_validation_to_response(e),
    };

    let split = match checked_split(&tab) {
        Ok(split) => split,
        Err(response) => return response,
    };

    match share_link(&state.config.base_url, &tab, state.config.link_style) {
        Ok(link) => {
            info!("Split '{}' between {} people", split.tab_name, split.splitters.len());
            (StatusCode::OK, Json(SplitResponse { link, split })).into_response()
        }
        Err(e) => ErrorMapper::codec_to_response(e),
    }
}

/// Recompute a split from the query string or compressed fragment of a share link
pub async fn load_split(RawQuery(query): RawQuery) -> impl IntoResponse {
    info!("GET /api/split/load - query: {:?}", query);

    let query = match query.filter(|query| !query.is_empty()) {
        Some(query) => query,
        None => return ErrorMapper::bad_request("Share link has no tab in it"),
    };

    let raw = match decode_fragment(&query) {
        Ok(raw) => raw,
        Err(e) => return ErrorMapper::codec_to_response(e),
    };

    let tab = match validate_tab(&raw) {
        Ok(tab) => tab,
        Err(e) => return ErrorMapper::tab_validation_to_response(e),
    };

    match checked_split(&tab) {
        Ok(split) => {
            let payment = payment_link(&split.tab_description);
            (StatusCode::OK, Json(LoadSplitResponse { split, payment })).into_response()
        }
        Err(response) => response,
    }
}

/// Calculate a split and verify it; a split that fails verification means the
/// calculator is wrong, not the caller.
pub(crate) fn checked_split(tab: &Tab) -> Result<Split, Response> {
    validate_split(calculate_split(tab)).map_err(|e| {
        error!("Calculated split for '{}' failed validation: {}", tab.tab_name, e);
        ErrorMapper::internal_error("Error calculating split")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::encode_query;
    use crate::domain::tab_codec::compress_query;
    use crate::io::rest::test_support::{read_json, send};
    use axum::http::Method;
    use serde_json::json;
    use shared::{DescriptionType, ErrorResponse, ValidationErrorResponse};

    fn wings_tab() -> Value {
        json!({
            "tabName": "Wings Night",
            "tabDescription": { "type": "Venmo", "details": "kyle-pays" },
            "taxAmount": 7.46,
            "tipAmount": 19.16,
            "tipBeforeTax": true,
            "items": [
                { "name": "Wings", "price": 34.99, "splitters": [{ "name": "Kyle" }, { "name": "Adam" }] },
                { "name": "Large Fries", "price": 7.49, "splitters": [{ "name": "Kyle" }] },
                { "name": "2x Michelob", "price": 13.5, "splitters": [{ "name": "Adam" }] }
            ],
            "splitters": [{ "name": "Kyle" }, { "name": "Adam" }]
        })
    }

    #[tokio::test]
    async fn test_create_split() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(Method::POST, "/api/split", Some(wings_tab())).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response: SplitResponse = read_json(response).await?;
        assert!(response.link.starts_with("http://localhost:3000/split?tabName=Wings+Night"));
        assert_eq!(response.split.splitters.len(), 2);
        assert_eq!(response.split.splitters[0].name, "Adam");
        assert!((response.split.total - 82.60).abs() < 0.01);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_split_reports_every_issue() -> Result<(), Box<dyn std::error::Error>> {
        let mut tab = wings_tab();
        tab["tabName"] = json!("");
        tab["taxAmount"] = json!(-1);
        tab["items"][1]["splitters"] = json!([{ "name": "Mystery" }]);

        let response = send(Method::POST, "/api/split", Some(tab)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response: ValidationErrorResponse = read_json(response).await?;
        let paths: Vec<String> = response.errors.iter().map(|e| e.dotted_path()).collect();
        assert!(paths.contains(&"tabName".to_string()));
        assert!(paths.contains(&"taxAmount".to_string()));
        assert!(response.errors.iter().any(|e| e.points_at("items")));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_split_rejects_non_objects() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(Method::POST, "/api/split", Some(json!([1, 2, 3]))).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response: ErrorResponse = read_json(response).await?;
        assert!(!response.error.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_split_extreme_amounts() -> Result<(), Box<dyn std::error::Error>> {
        let tiny_tax = json!({
            "tabName": "Coffee",
            "taxAmount": 1e-20,
            "tipAmount": 0,
            "items": [{ "name": "Latte", "price": 10.0, "splitters": [{ "name": "Dana" }] }],
            "splitters": [{ "name": "Dana" }]
        });
        let response = send(Method::POST, "/api/split", Some(tiny_tax)).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let large_item = json!({
            "tabName": "Acquisition Dinner",
            "taxAmount": 7.77,
            "tipAmount": 13.13,
            "tipBeforeTax": false,
            "items": [{
                "name": "Company",
                "price": 123456789012345.67,
                "splitters": [{ "name": "Alice" }, { "name": "Bob" }, { "name": "Carol" }]
            }],
            "splitters": [{ "name": "Alice" }, { "name": "Bob" }, { "name": "Carol" }]
        });
        let response = send(Method::POST, "/api/split", Some(large_item)).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response: SplitResponse = read_json(response).await?;
        assert_eq!(response.split.splitters.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_split_from_query_link()-> Result<(), Box<dyn std::error::Error>> {
        let tab = validate_tab(&wings_tab())?;
        let uri = format!("/api/split/load?{}", encode_query(&tab)?);

        let response = send(Method::GET, &uri, None).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response: LoadSplitResponse = read_json(response).await?;
        assert_eq!(response.split.tab_name, "Wings Night");
        let payment = response.payment.ok_or("expected a payment link")?;
        assert_eq!(payment.kind, DescriptionType::Venmo);
        assert_eq!(payment.url, "https://venmo.com/u/kyle-pays");

        Ok(())
    }

    #[tokio::test]
    async fn test_load_split_from_compressed_link() -> Result<(), Box<dyn std::error::Error>> {
        let tab = validate_tab(&wings_tab())?;
        let uri = format!("/api/split/load?{}", compress_query(&tab)?);

        let response = send(Method::GET, &uri, None).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let response: LoadSplitResponse = read_json(response).await?;
        assert_eq!(response.split.items.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_split_bad_links() -> Result<(), Box<dyn std::error::Error>> {
        let empty = send(Method::GET, "/api/split/load", None).await?;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let broken_json = send(
            Method::GET,
            "/api/split/load?tabName=Lunch&taxAmount=1&tipAmount=1&items=%5B%7B&splitters=%5B%5D",
            None,
        )
        .await?;
        assert_eq!(broken_json.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(broken_json).await?;
        assert!(body.error.contains("items"));

        Ok(())
    }
}
