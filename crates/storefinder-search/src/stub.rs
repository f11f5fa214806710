//! Deterministic in-memory providers.
//!
//! Test doubles for the [`Geocoder`] and [`PlacesSearch`] seams, shared by
//! the test suites of this workspace. Neither binary wires them in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use storefinder_core::{
    normalize_postal_code, AccessToken, CandidateStore, Coordinate, GeocodeError, Geocoder,
    PlacesError, PlacesQuery, PlacesSearch, SearchLocation,
};

/// `(postal code, city, state, latitude, longitude)`.
const KNOWN_POSTAL_CODES: &[(&str, &str, &str, f64, f64)] = &[
    ("48201", "Detroit", "MI", 42.3314, -83.0458),
    ("10001", "New York", "NY", 40.7506, -73.9972),
    ("60601", "Chicago", "IL", 41.8858, -87.6181),
    ("90210", "Beverly Hills", "CA", 34.0901, -118.4065),
    ("33101", "Miami", "FL", 25.7791, -80.1978),
    ("98101", "Seattle", "WA", 47.6114, -122.3305),
];

#[derive(Debug, Default)]
pub struct StubGeocoder {
    locations: HashMap<String, SearchLocation>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// A geocoder that resolves a fixed set of real US postal codes.
    #[must_use]
    pub fn with_known_postal_codes() -> Self {
        KNOWN_POSTAL_CODES
            .iter()
            .fold(Self::default(), |stub, &(code, city, state, lat, lon)| {
                stub.with_location(SearchLocation {
                    coordinate: Coordinate::new(lat, lon),
                    city: city.to_string(),
                    state: state.to_string(),
                    postal_code: code.to_string(),
                })
            })
    }

    #[must_use]
    pub fn with_location(mut self, location: SearchLocation) -> Self {
        self.locations
            .insert(location.postal_code.clone(), location);
        self
    }

    /// Every lookup fails with [`GeocodeError::ServiceUnavailable`].
    #[must_use]
    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_string()),
            ..Self::default()
        }
    }

    /// Sleep before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups that reached the stub.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StubGeocoder {
    async fn geocode(
        &self,
        _token: &AccessToken,
        postal_code: &str,
    ) -> Result<SearchLocation, GeocodeError> {
        let postal_code = normalize_postal_code(postal_code)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(detail) = &self.failure {
            return Err(GeocodeError::ServiceUnavailable(detail.clone()));
        }

        self.locations
            .get(postal_code)
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound(postal_code.to_string()))
    }
}

/// Places search keyed by search term. Unknown terms return no candidates.
#[derive(Debug, Default)]
pub struct StubPlaces {
    responses: HashMap<String, Result<Vec<CandidateStore>, PlacesError>>,
    queried_terms: Mutex<Vec<String>>,
}

impl StubPlaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_results(mut self, term: &str, candidates: Vec<CandidateStore>) -> Self {
        self.responses.insert(term.to_string(), Ok(candidates));
        self
    }

    #[must_use]
    pub fn with_failure(mut self, term: &str, error: PlacesError) -> Self {
        self.responses.insert(term.to_string(), Err(error));
        self
    }

    /// Terms queried so far, in call order.
    #[must_use]
    pub fn queried_terms(&self) -> Vec<String> {
        self.queried_terms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PlacesSearch for StubPlaces {
    async fn search(
        &self,
        _token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, PlacesError> {
        self.queried_terms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.term.to_string());

        match self.responses.get(query.term) {
            Some(Ok(candidates)) => Ok(candidates
                .iter()
                .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(Vec::new()),
        }
    }
}

/// Shorthand for building a [`CandidateStore`].
#[must_use]
pub fn candidate(id: &str, name: &str, latitude: f64, longitude: f64) -> CandidateStore {
    CandidateStore {
        external_id: id.to_string(),
        raw_name: name.to_string(),
        full_address: format!("{name}, 1 Main St"),
        coordinate: Coordinate::new(latitude, longitude),
    }
}
