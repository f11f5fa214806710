mod catalog;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_core::{AppConfig, Geocoder, PlacesSearch};
use storefinder_search::{SearchError, StoreSearch};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Radii the API accepts, in miles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadiusPolicy {
    pub allowed: Vec<u32>,
    pub default: u32,
}

impl RadiusPolicy {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            allowed: config.allowed_radii.clone(),
            default: config.default_radius_miles,
        }
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            allowed: vec![5, 10, 20, 40, 60],
            default: 10,
        }
    }
}

pub struct AppState<G, P> {
    pub search: Arc<StoreSearch<G, P>>,
    pub radii: Arc<RadiusPolicy>,
}

impl<G, P> Clone for AppState<G, P> {
    fn clone(&self) -> Self {
        Self {
            search: Arc::clone(&self.search),
            radii: Arc::clone(&self.radii),
        }
    }
}

impl<G, P> AppState<G, P> {
    pub fn new(search: StoreSearch<G, P>, radii: RadiusPolicy) -> Self {
        Self {
            search: Arc::new(search),
            radii: Arc::new(radii),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "configuration_error" | "upstream_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Map a pipeline failure to a stable error code with a generic message.
/// Upstream detail goes to the log only.
pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::InvalidPostalCode(_) => ApiError::new(
            request_id,
            "validation_error",
            "zip must be a 5-digit US postal code",
        ),
        SearchError::InvalidRadius(_) => {
            ApiError::new(request_id, "validation_error", "radius is not allowed")
        }
        SearchError::NotFound(_) => ApiError::new(
            request_id,
            "not_found",
            "no location found for that postal code",
        ),
        SearchError::Configuration(detail) => {
            tracing::error!(error = %detail, "store search is not configured");
            ApiError::new(
                request_id,
                "configuration_error",
                "store search is not configured",
            )
        }
        SearchError::ServiceUnavailable(detail) => {
            tracing::warn!(error = %detail, "location service unavailable");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                "location service is temporarily unavailable",
            )
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app<G, P>(state: AppState<G, P>, rate_limit: RateLimitState) -> Router
where
    G: Geocoder + 'static,
    P: PlacesSearch + 'static,
{
    let public_routes = Router::new().route("/api/v1/health", get(health));

    let limited_routes = Router::new()
        .route("/api/v1/search", get(search::run_search::<G, P>))
        .route("/api/v1/brands", get(catalog::list_brands::<G, P>))
        .route("/api/v1/radii", get(catalog::list_radii::<G, P>))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn rate_limit_state(per_minute: usize) -> RateLimitState {
    RateLimitState::new(per_minute, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
