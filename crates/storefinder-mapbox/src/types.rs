//! Wire types for the Mapbox responses the client consumes.
//!
//! Only the fields the pipeline reads are modelled; everything else is
//! ignored by serde.

use serde::Deserialize;

/// Geocoding v5 `FeatureCollection`.
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingFeature {
    pub id: String,
    /// Short display name, e.g. `"Walmart Supercenter"` or `"48201"`.
    pub text: String,
    /// Full display name, e.g. `"Detroit, Michigan 48201, United States"`.
    pub place_name: String,
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    #[serde(default)]
    pub context: Vec<GeocodingContext>,
}

/// One entry of a v5 feature's `context` hierarchy (`place.*`, `region.*`, ...).
#[derive(Debug, Deserialize)]
pub struct GeocodingContext {
    pub id: String,
    pub text: String,
    /// ISO 3166-2 code for regions, e.g. `"US-MI"`.
    #[serde(default)]
    pub short_code: Option<String>,
}

/// Search Box v1 `forward` `FeatureCollection`.
#[derive(Debug, Deserialize)]
pub struct SearchBoxResponse {
    #[serde(default)]
    pub features: Vec<SearchBoxFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBoxFeature {
    pub geometry: SearchBoxGeometry,
    pub properties: SearchBoxProperties,
}

#[derive(Debug, Deserialize)]
pub struct SearchBoxGeometry {
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub struct SearchBoxProperties {
    pub mapbox_id: String,
    pub name: String,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub place_formatted: Option<String>,
    #[serde(default)]
    pub coordinates: Option<SearchBoxCoordinates>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBoxCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}
