//! HTTP client for the Mapbox Geocoding v5 and Search Box v1 APIs.
//!
//! The access token travels as the `access_token` query parameter, so every
//! error produced here is stripped of its URL and status errors report only
//! the request path.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use storefinder_core::{
    AccessToken, AppConfig, CandidateStore, PlacesEndpoint, PlacesQuery, SearchLocation,
};

use crate::error::MapboxError;
use crate::parse;
use crate::retry::RetryPolicy;
use crate::types::{GeocodingResponse, SearchBoxResponse};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Characters left unescaped in a path segment, matching
/// `encodeURIComponent`'s unreserved set minus the sub-delimiters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Mapbox search APIs.
///
/// Use [`MapboxClient::new`] for production or [`MapboxClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    client: Client,
    base_url: Url,
    places_endpoint: PlacesEndpoint,
    retry: RetryPolicy,
}

impl MapboxClient {
    /// Creates a client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, MapboxError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`MapboxError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`MapboxError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, MapboxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("storefinder/0.1")
            .build()
            .map_err(MapboxError::http)?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| MapboxError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            places_endpoint: PlacesEndpoint::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`MapboxClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, MapboxError> {
        Ok(
            Self::with_base_url(config.request_timeout_secs, &config.mapbox_base_url)?
                .with_places_endpoint(config.places_endpoint)
                .with_retry(config.max_retries, config.retry_backoff_base_ms),
        )
    }

    #[must_use]
    pub fn with_places_endpoint(mut self, endpoint: PlacesEndpoint) -> Self {
        self.places_endpoint = endpoint;
        self
    }

    /// Enables bounded retries on transient failures (timeouts, 429, 5xx).
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy::new(max_retries, backoff_base_ms);
        self
    }

    #[must_use]
    pub fn places_endpoint(&self) -> PlacesEndpoint {
        self.places_endpoint
    }

    /// Looks up a US postal code through Geocoding v5.
    ///
    /// Returns `Ok(None)` when Mapbox has no matching postcode feature.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Http`] on network failure.
    /// - [`MapboxError::UnexpectedStatus`] on a non-2xx response.
    /// - [`MapboxError::Deserialize`] if the body is not a feature collection.
    pub async fn geocode_postal_code(
        &self,
        token: &AccessToken,
        postal_code: &str,
    ) -> Result<Option<SearchLocation>, MapboxError> {
        let url = self.geocoding_url(
            postal_code,
            &[
                ("types", "postcode"),
                ("country", "US"),
                ("limit", "1"),
                ("access_token", token.expose()),
            ],
        )?;

        let response: GeocodingResponse = self
            .request_json(&url, &format!("postcode lookup ({postal_code})"))
            .await?;

        Ok(response
            .features
            .first()
            .and_then(|feature| parse::location_from_feature(feature, postal_code)))
    }

    /// Runs a POI search with whichever endpoint family is configured.
    ///
    /// # Errors
    ///
    /// See [`MapboxClient::search_places_geocoding`].
    pub async fn search_places(
        &self,
        token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, MapboxError> {
        match self.places_endpoint {
            PlacesEndpoint::Geocoding => self.search_places_geocoding(token, query).await,
            PlacesEndpoint::SearchBox => self.search_places_searchbox(token, query).await,
        }
    }

    /// POI search through the Geocoding v5 path-style endpoint.
    ///
    /// # Errors
    ///
    /// - [`MapboxError::Http`] on network failure.
    /// - [`MapboxError::UnexpectedStatus`] on a non-2xx response.
    /// - [`MapboxError::Deserialize`] if the body is not a feature collection.
    pub async fn search_places_geocoding(
        &self,
        token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, MapboxError> {
        let params = poi_params(query);
        let mut pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        pairs.push(("access_token", token.expose()));

        let url = self.geocoding_url(query.term, &pairs)?;
        let response: GeocodingResponse = self
            .request_json(&url, &format!("places search ({})", query.term))
            .await?;

        Ok(response
            .features
            .iter()
            .filter_map(parse::candidate_from_geocoding)
            .collect())
    }

    /// POI search through the Search Box v1 `forward` endpoint.
    ///
    /// # Errors
    ///
    /// Same as [`MapboxClient::search_places_geocoding`].
    pub async fn search_places_searchbox(
        &self,
        token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, MapboxError> {
        let params = poi_params(query);
        let mut pairs: Vec<(&str, &str)> = vec![("q", query.term)];
        pairs.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
        pairs.push(("access_token", token.expose()));

        let url = self.build_url("search/searchbox/v1/forward", &pairs)?;
        let response: SearchBoxResponse = self
            .request_json(&url, &format!("searchbox forward ({})", query.term))
            .await?;

        Ok(response
            .features
            .iter()
            .filter_map(parse::candidate_from_searchbox)
            .collect())
    }

    /// `geocoding/v5/mapbox.places/{query}.json` with `query` percent-encoded
    /// as a single path segment.
    fn geocoding_url(&self, query: &str, params: &[(&str, &str)]) -> Result<Url, MapboxError> {
        let encoded = utf8_percent_encode(query.trim(), PATH_SEGMENT);
        self.build_url(&format!("geocoding/v5/mapbox.places/{encoded}.json"), params)
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, MapboxError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| MapboxError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request (with retries), asserts a 2xx status, and
    /// deserializes the body.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, MapboxError> {
        self.retry.run(|| async move {
            let response = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(MapboxError::http)?;

            let status = response.status();
            if !status.is_success() {
                return Err(MapboxError::UnexpectedStatus {
                    status: status.as_u16(),
                    path: url.path().to_owned(),
                });
            }

            let body = response.text().await.map_err(MapboxError::http)?;
            serde_json::from_str(&body).map_err(|e| MapboxError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
        })
        .await
    }
}

/// Query parameters shared by both POI endpoints, minus the token.
fn poi_params(query: &PlacesQuery<'_>) -> Vec<(&'static str, String)> {
    let mut params = vec![(
        "proximity",
        format!("{},{}", query.proximity.longitude, query.proximity.latitude),
    )];
    if let Some(bbox) = query.bbox {
        params.push(("bbox", bbox.to_query_value()));
    }
    params.push(("limit", query.limit.to_string()));
    params.push(("types", "poi".to_owned()));
    params
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
