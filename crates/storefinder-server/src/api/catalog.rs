use axum::{extract::State, Extension, Json};
use serde::Serialize;
use storefinder_core::{Geocoder, PlacesSearch};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct BrandItem {
    pub label: String,
    pub slug: String,
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub(super) struct RadiiData {
    pub allowed: Vec<u32>,
    pub default: u32,
}

pub(super) async fn list_brands<G: Geocoder, P: PlacesSearch>(
    State(state): State<AppState<G, P>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<BrandItem>>> {
    let data = state
        .search
        .brands()
        .iter()
        .map(|brand| BrandItem {
            label: brand.label.clone(),
            slug: brand.slug(),
            search_term: brand.search_term.clone(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_radii<G: Geocoder, P: PlacesSearch>(
    State(state): State<AppState<G, P>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RadiiData>> {
    Json(ApiResponse {
        data: RadiiData {
            allowed: state.radii.allowed.clone(),
            default: state.radii.default,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
