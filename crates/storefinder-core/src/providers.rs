//! Seams between the search pipeline and the external services it calls.
//!
//! The pipeline is generic over [`Geocoder`] and [`PlacesSearch`] so tests can
//! substitute deterministic stubs and deployments can swap the upstream
//! endpoint family without touching the pipeline.

use std::future::Future;

use thiserror::Error;

use crate::geo::{BoundingBox, Coordinate};
use crate::types::{CandidateStore, SearchLocation};

/// API access token for the upstream services.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token, returning `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("invalid postal code '{0}': expected 5 digits")]
    InvalidPostalCode(String),

    #[error("postal code {0} did not resolve to a location")]
    NotFound(String),

    #[error("geocoding service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacesError {
    #[error("places request failed: {0}")]
    Transport(String),

    #[error("places service returned HTTP {status}")]
    Status { status: u16 },

    #[error("places response could not be decoded: {0}")]
    Decode(String),
}

/// One places-search request.
#[derive(Debug, Clone, Copy)]
pub struct PlacesQuery<'a> {
    pub term: &'a str,
    pub proximity: Coordinate,
    pub bbox: Option<BoundingBox>,
    pub limit: u32,
}

/// Resolves a postal code to a [`SearchLocation`].
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        token: &AccessToken,
        postal_code: &str,
    ) -> impl Future<Output = Result<SearchLocation, GeocodeError>> + Send;
}

/// Free-text place search near a point.
pub trait PlacesSearch: Send + Sync {
    fn search(
        &self,
        token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> impl Future<Output = Result<Vec<CandidateStore>, PlacesError>> + Send;
}

/// Validate a US ZIP code, returning the trimmed 5-digit form.
///
/// # Errors
///
/// Returns [`GeocodeError::InvalidPostalCode`] for anything other than five
/// ASCII digits.
pub fn normalize_postal_code(raw: &str) -> Result<&str, GeocodeError> {
    let trimmed = raw.trim();
    if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(trimmed)
    } else {
        Err(GeocodeError::InvalidPostalCode(trimmed.to_string()))
    }
}
