use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefinder_core::{Geocoder, PlacesSearch, SearchLocation, Store};
use storefinder_search::SearchOutcome;

use crate::middleware::RequestId;

use super::{map_search_error, ApiError, ApiResponse, AppState, RadiusPolicy, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub zip: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    /// Stable per-render key, unique across brands.
    pub key: String,
    #[serde(flatten)]
    pub store: Store,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    pub location: SearchLocation,
    pub radius_miles: u32,
    pub stores: Vec<StoreItem>,
    pub failed_brands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl SearchData {
    fn from_outcome(outcome: SearchOutcome, radius_miles: u32) -> Self {
        let message = outcome.message();
        Self {
            location: outcome.location,
            radius_miles,
            stores: outcome
                .stores
                .into_iter()
                .map(|store| StoreItem {
                    key: store.key(),
                    store,
                })
                .collect(),
            failed_brands: outcome.failed_brands,
            message,
        }
    }
}

/// Parse and check `radius` against the allowed set; absent means default.
fn resolve_radius(raw: Option<&str>, policy: &RadiusPolicy) -> Result<u32, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(policy.default);
    };
    let radius: u32 = raw
        .parse()
        .map_err(|_| format!("radius must be one of {:?}", policy.allowed))?;
    if policy.allowed.contains(&radius) {
        Ok(radius)
    } else {
        Err(format!("radius must be one of {:?}", policy.allowed))
    }
}

pub(super) async fn run_search<G: Geocoder, P: PlacesSearch>(
    State(state): State<AppState<G, P>>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Some(zip) = params.zip.as_deref().map(str::trim).filter(|z| !z.is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "zip query parameter is required",
        ));
    };

    let radius = resolve_radius(params.radius.as_deref(), &state.radii)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let outcome = state
        .search
        .run(zip, f64::from(radius))
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SearchData::from_outcome(outcome, radius),
        meta: ResponseMeta::new(req_id.0),
    }))
}
