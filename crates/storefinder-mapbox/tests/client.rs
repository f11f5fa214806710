//! Integration tests for `MapboxClient` using wiremock HTTP mocks.

use storefinder_core::{
    bounding_box, AccessToken, Coordinate, GeocodeError, Geocoder, PlacesEndpoint, PlacesError,
    PlacesQuery, PlacesSearch,
};
use storefinder_mapbox::MapboxClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MapboxClient {
    MapboxClient::with_base_url(10, base_url).expect("client construction should not fail")
}

fn token() -> AccessToken {
    AccessToken::new("pk.test-token").expect("non-blank token")
}

fn detroit() -> Coordinate {
    Coordinate::new(42.3314, -83.0458)
}

fn postcode_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "id": "postcode.8224",
            "type": "Feature",
            "text": "48201",
            "place_name": "Detroit, Michigan 48201, United States",
            "center": [-83.0458, 42.3314],
            "context": [
                { "id": "place.1234", "text": "Detroit" },
                { "id": "region.5678", "text": "Michigan", "short_code": "US-MI" },
                { "id": "country.1", "text": "United States", "short_code": "us" }
            ]
        }]
    })
}

#[tokio::test]
async fn geocode_returns_location_with_structured_city_and_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/48201.json"))
        .and(query_param("types", "postcode"))
        .and(query_param("country", "US"))
        .and(query_param("limit", "1"))
        .and(query_param("access_token", "pk.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(postcode_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let location = client
        .geocode(&token(), " 48201 ")
        .await
        .expect("should geocode");

    assert_eq!(location.city, "Detroit");
    assert_eq!(location.state, "MI");
    assert_eq!(location.postal_code, "48201");
    assert!((location.coordinate.latitude - 42.3314).abs() < 1e-9);
    assert!((location.coordinate.longitude - (-83.0458)).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_with_no_features_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/99999.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "type": "FeatureCollection", "features": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode(&token(), "99999")
        .await
        .expect_err("should be not found");
    assert_eq!(err, GeocodeError::NotFound("99999".to_string()));
}

#[tokio::test]
async fn geocode_rejects_malformed_postal_code_without_calling_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(postcode_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode(&token(), "4820")
        .await
        .expect_err("should reject");
    assert!(matches!(err, GeocodeError::InvalidPostalCode(_)));
}

#[tokio::test]
async fn geocode_server_error_is_service_unavailable_and_hides_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .geocode(&token(), "48201")
        .await
        .expect_err("should fail");

    let detail = match err {
        GeocodeError::ServiceUnavailable(detail) => detail,
        other => panic!("expected ServiceUnavailable, got {other:?}"),
    };
    assert!(detail.contains("503"), "detail should name the status: {detail}");
    assert!(
        !detail.contains("pk.test-token"),
        "token must not leak into errors: {detail}"
    );
}

#[tokio::test]
async fn places_search_sends_proximity_bbox_and_limit() {
    let server = MockServer::start().await;
    let bbox = bounding_box(detroit(), 10.0);

    let body = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "id": "poi.1",
                "text": "Walmart Supercenter",
                "place_name": "Walmart Supercenter, 5851 Mercury Dr, Dearborn, Michigan 48126, United States",
                "center": [-83.1697, 42.3281]
            },
            {
                "id": "poi.2",
                "text": "Walmart Pharmacy",
                "place_name": "Walmart Pharmacy, 5851 Mercury Dr, Dearborn, Michigan 48126, United States",
                "center": [-83.1697, 42.3281]
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/Walmart.json"))
        .and(query_param("proximity", "-83.0458,42.3314"))
        .and(query_param("bbox", bbox.to_query_value().as_str()))
        .and(query_param("limit", "5"))
        .and(query_param("types", "poi"))
        .and(query_param("access_token", "pk.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = PlacesQuery {
        term: "Walmart",
        proximity: detroit(),
        bbox: Some(bbox),
        limit: 5,
    };
    let candidates = client.search(&token(), &query).await.expect("should search");

    // Relevance filtering happens downstream; the adapter returns everything.
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].external_id, "poi.1");
    assert_eq!(candidates[0].raw_name, "Walmart Supercenter");
    assert!(candidates[0].full_address.contains("Mercury Dr"));
}

#[tokio::test]
async fn places_search_multi_word_term_is_encoded_in_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/Dollar%20Tree.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = PlacesQuery {
        term: "Dollar Tree",
        proximity: detroit(),
        bbox: None,
        limit: 5,
    };
    let candidates = client.search(&token(), &query).await.expect("should search");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn searchbox_endpoint_uses_forward_search() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-83.05, 42.34] },
            "properties": {
                "mapbox_id": "dXJuOm1ieHBvaTpjdnM",
                "name": "CVS",
                "full_address": "1 Woodward Ave, Detroit, Michigan 48226, United States",
                "coordinates": { "latitude": 42.34, "longitude": -83.05 }
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path("/search/searchbox/v1/forward"))
        .and(query_param("q", "CVS"))
        .and(query_param("types", "poi"))
        .and(query_param("limit", "3"))
        .and(query_param("access_token", "pk.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_places_endpoint(PlacesEndpoint::SearchBox);
    let query = PlacesQuery {
        term: "CVS",
        proximity: detroit(),
        bbox: None,
        limit: 3,
    };
    let candidates = client.search(&token(), &query).await.expect("should search");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].external_id, "dXJuOm1ieHBvaTpjdnM");
    assert_eq!(candidates[0].raw_name, "CVS");
}

#[tokio::test]
async fn places_status_error_maps_to_status_variant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = PlacesQuery {
        term: "Kroger",
        proximity: detroit(),
        bbox: None,
        limit: 5,
    };
    let err = client
        .search(&token(), &query)
        .await
        .expect_err("should fail");
    assert_eq!(err, PlacesError::Status { status: 401 });
}

#[tokio::test]
async fn places_malformed_body_maps_to_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let query = PlacesQuery {
        term: "Publix",
        proximity: detroit(),
        bbox: None,
        limit: 5,
    };
    let err = client
        .search(&token(), &query)
        .await
        .expect_err("should fail");
    assert!(matches!(err, PlacesError::Decode(_)));
}

#[tokio::test]
async fn transient_failure_is_retried_when_enabled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v5/mapbox.places/48201.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(postcode_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let location = client
        .geocode(&token(), "48201")
        .await
        .expect("retry should recover");
    assert_eq!(location.city, "Detroit");
}
