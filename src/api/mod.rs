//! REST API endpoints.
//!
//! Axum-based HTTP API that runs statistics views over records posted by
//! the dashboard. The server holds no data: every request carries the
//! records it wants aggregated.

pub mod routes;
pub mod state;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::StatsError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed JSON whose records do not fit the record shape.
    #[error("Malformed records: {0}")]
    MalformedRecords(String),

    #[error("Unprocessable records: {0}")]
    Unprocessable(#[from] StatsError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::MalformedRecords(err.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::MalformedRecords(_)
            | ApiError::Unprocessable(StatsError::InvalidRecord { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_RECORD")
            }
            ApiError::Unprocessable(StatsError::InvalidWeight { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_WEIGHT")
            }
            ApiError::Unprocessable(StatsError::UsageOverflow { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "USAGE_OVERFLOW")
            }
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// CORS policy for a configured origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/stats/items/best", post(routes::stats::best_items))
        .route("/api/stats/enchants/best", post(routes::stats::best_enchants))
        .route("/api/stats/slots", post(routes::stats::slot_table))
        .route("/api/stats/gems/overview", post(routes::stats::gem_overview))
        .route("/api/stats/gems/by-slot", post(routes::stats::gems_by_slot))
        .route("/api/stats/compositions", post(routes::stats::compositions))
        .route("/api/stats/key-levels", post(routes::stats::key_levels))
        .route("/api/stats/specs", post(routes::stats::specs))
        .route("/api/stats/talents", post(routes::stats::talents))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
