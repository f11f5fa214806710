use storefinder_core::GeocodeError;
use thiserror::Error;

/// Failures that abort a store search.
///
/// Per-brand places failures never appear here; they degrade to an empty
/// brand result inside the fan-out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Credentials or other required configuration are missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid radius: {0}")]
    InvalidRadius(String),

    #[error("invalid postal code '{0}': expected 5 digits")]
    InvalidPostalCode(String),

    /// The postal code did not resolve to a location.
    #[error("no location found for postal code {0}")]
    NotFound(String),

    /// Geocoding failed at the transport level or exceeded its deadline.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<GeocodeError> for SearchError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::InvalidPostalCode(code) => Self::InvalidPostalCode(code),
            GeocodeError::NotFound(code) => Self::NotFound(code),
            GeocodeError::ServiceUnavailable(detail) => Self::ServiceUnavailable(detail),
        }
    }
}
