//! Conversion from Mapbox wire types to pipeline domain types.

use storefinder_core::{CandidateStore, Coordinate, SearchLocation};

use crate::types::{GeocodingContext, GeocodingFeature, SearchBoxFeature};

/// Build a [`SearchLocation`] from a postcode feature.
///
/// City and state come from the structured `context` entries when present;
/// otherwise they are split out of `place_name`. Returns `None` when the
/// feature's center is not a valid coordinate.
pub(crate) fn location_from_feature(
    feature: &GeocodingFeature,
    postal_code: &str,
) -> Option<SearchLocation> {
    let coordinate = Coordinate::from_lon_lat(feature.center)?;

    let (ctx_city, ctx_state) = city_state_from_context(&feature.context);
    let (split_city, split_state) = split_place_name(&feature.place_name);

    let city = ctx_city.or(split_city).unwrap_or_default();
    let state = ctx_state.or(split_state).unwrap_or_default();
    if city.is_empty() || state.is_empty() {
        tracing::warn!(
            postal_code,
            place_name = %feature.place_name,
            "could not determine city/state for postal code"
        );
    }

    Some(SearchLocation {
        coordinate,
        city,
        state,
        postal_code: postal_code.to_string(),
    })
}

/// Read `place.*` text and the `region.*` ISO code from a feature context.
fn city_state_from_context(context: &[GeocodingContext]) -> (Option<String>, Option<String>) {
    let city = context
        .iter()
        .find(|c| c.id.starts_with("place."))
        .map(|c| c.text.trim().to_string())
        .filter(|s| !s.is_empty());

    let state = context
        .iter()
        .find(|c| c.id.starts_with("region."))
        .and_then(|c| c.short_code.as_deref())
        .map(|code| code.rsplit('-').next().unwrap_or(code).to_ascii_uppercase())
        .filter(|code| is_state_code(code));

    (city, state)
}

/// Heuristic split of `"City, ST 12345, Country"`: the city is the first
/// comma part, the state the first whitespace token of the second part.
fn split_place_name(place_name: &str) -> (Option<String>, Option<String>) {
    let mut parts = place_name.split(',').map(str::trim);

    let city = parts
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let state = parts
        .next()
        .and_then(|segment| segment.split_whitespace().next())
        .filter(|token| is_state_code(token))
        .map(str::to_ascii_uppercase);

    (city, state)
}

fn is_state_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

pub(crate) fn candidate_from_geocoding(feature: &GeocodingFeature) -> Option<CandidateStore> {
    let Some(coordinate) = Coordinate::from_lon_lat(feature.center) else {
        tracing::debug!(id = %feature.id, "skipping place with invalid center");
        return None;
    };
    let name = feature.text.trim();
    if name.is_empty() {
        return None;
    }

    Some(CandidateStore {
        external_id: feature.id.clone(),
        raw_name: name.to_string(),
        full_address: feature.place_name.trim().to_string(),
        coordinate,
    })
}

pub(crate) fn candidate_from_searchbox(feature: &SearchBoxFeature) -> Option<CandidateStore> {
    let props = &feature.properties;

    let coordinate = props
        .coordinates
        .as_ref()
        .map(|c| Coordinate::new(c.latitude, c.longitude))
        .filter(Coordinate::is_valid)
        .or_else(|| Coordinate::from_lon_lat(feature.geometry.coordinates));
    let Some(coordinate) = coordinate else {
        tracing::debug!(id = %props.mapbox_id, "skipping place with invalid coordinates");
        return None;
    };

    let name = props.name.trim();
    if name.is_empty() {
        return None;
    }

    let full_address = props
        .full_address
        .as_deref()
        .or(props.place_formatted.as_deref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Some(CandidateStore {
        external_id: props.mapbox_id.clone(),
        raw_name: name.to_string(),
        full_address,
        coordinate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeocodingResponse, SearchBoxResponse};

    fn postcode_feature(json: serde_json::Value) -> GeocodingFeature {
        let response: GeocodingResponse =
            serde_json::from_value(serde_json::json!({ "features": [json] })).expect("parse");
        response.features.into_iter().next().expect("one feature")
    }

    #[test]
    fn prefers_structured_context() {
        let feature = postcode_feature(serde_json::json!({
            "id": "postcode.1",
            "text": "48201",
            "place_name": "Detroit, Michigan 48201, United States",
            "center": [-83.0458, 42.3314],
            "context": [
                { "id": "place.9", "text": "Detroit" },
                { "id": "region.7", "text": "Michigan", "short_code": "US-MI" },
                { "id": "country.1", "text": "United States", "short_code": "us" }
            ]
        }));
        let loc = location_from_feature(&feature, "48201").expect("location");
        assert_eq!(loc.city, "Detroit");
        assert_eq!(loc.state, "MI");
        assert_eq!(loc.postal_code, "48201");
        assert!((loc.coordinate.latitude - 42.3314).abs() < 1e-9);
        assert!((loc.coordinate.longitude - (-83.0458)).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_place_name_split() {
        let feature = postcode_feature(serde_json::json!({
            "id": "postcode.1",
            "text": "48201",
            "place_name": "Detroit, MI 48201, United States",
            "center": [-83.0458, 42.3314]
        }));
        let loc = location_from_feature(&feature, "48201").expect("location");
        assert_eq!(loc.city, "Detroit");
        assert_eq!(loc.state, "MI");
    }

    #[test]
    fn unexpected_place_name_leaves_state_empty() {
        let feature = postcode_feature(serde_json::json!({
            "id": "postcode.1",
            "text": "48201",
            "place_name": "Detroit Michigan",
            "center": [-83.0458, 42.3314]
        }));
        let loc = location_from_feature(&feature, "48201").expect("location");
        assert_eq!(loc.city, "Detroit Michigan");
        assert_eq!(loc.state, "");
    }

    #[test]
    fn invalid_center_yields_none() {
        let feature = postcode_feature(serde_json::json!({
            "id": "postcode.1",
            "text": "00000",
            "place_name": "Nowhere",
            "center": [200.0, 95.0]
        }));
        assert!(location_from_feature(&feature, "00000").is_none());
    }

    #[test]
    fn split_place_name_handles_missing_second_part() {
        assert_eq!(split_place_name("Detroit"), (Some("Detroit".to_string()), None));
        assert_eq!(split_place_name(""), (None, None));
    }

    #[test]
    fn geocoding_poi_maps_text_and_place_name() {
        let feature = postcode_feature(serde_json::json!({
            "id": "poi.42",
            "text": "Walmart Supercenter",
            "place_name": "Walmart Supercenter, 123 Main St, Detroit, Michigan 48201, United States",
            "center": [-83.04, 42.33]
        }));
        let candidate = candidate_from_geocoding(&feature).expect("candidate");
        assert_eq!(candidate.external_id, "poi.42");
        assert_eq!(candidate.raw_name, "Walmart Supercenter");
        assert!(candidate.full_address.contains("123 Main St"));
        assert!((candidate.coordinate.latitude - 42.33).abs() < 1e-9);
    }

    #[test]
    fn searchbox_prefers_property_coordinates() {
        let response: SearchBoxResponse = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                "properties": {
                    "mapbox_id": "dXJuOm1ieHBvaTox",
                    "name": "CVS",
                    "full_address": "500 Woodward Ave, Detroit, Michigan 48226, United States",
                    "coordinates": { "latitude": 42.33, "longitude": -83.045 }
                }
            }]
        }))
        .expect("parse");
        let candidate = candidate_from_searchbox(&response.features[0]).expect("candidate");
        assert_eq!(candidate.external_id, "dXJuOm1ieHBvaTox");
        assert!((candidate.coordinate.longitude - (-83.045)).abs() < 1e-9);
        assert!(candidate.full_address.starts_with("500 Woodward"));
    }

    #[test]
    fn searchbox_falls_back_to_place_formatted_and_geometry() {
        let response: SearchBoxResponse = serde_json::from_value(serde_json::json!({
            "features": [{
                "geometry": { "coordinates": [-83.1, 42.4] },
                "properties": {
                    "mapbox_id": "abc",
                    "name": "Michaels",
                    "place_formatted": "Detroit, Michigan 48202"
                }
            }]
        }))
        .expect("parse");
        let candidate = candidate_from_searchbox(&response.features[0]).expect("candidate");
        assert_eq!(candidate.full_address, "Detroit, Michigan 48202");
        assert!((candidate.coordinate.latitude - 42.4).abs() < 1e-9);
    }
}
