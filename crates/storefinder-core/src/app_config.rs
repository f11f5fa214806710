use std::net::SocketAddr;
use std::path::PathBuf;

use crate::relevance::MatchPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which Mapbox endpoint family backs the per-brand places search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacesEndpoint {
    /// Geocoding v5, path-style `mapbox.places/{term}.json` POI search.
    #[default]
    Geocoding,
    /// Search Box v1 `forward` endpoint.
    SearchBox,
}

impl std::fmt::Display for PlacesEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacesEndpoint::Geocoding => write!(f, "geocoding"),
            PlacesEndpoint::SearchBox => write!(f, "searchbox"),
        }
    }
}

/// Runtime settings. The Mapbox access token is not stored here; it is
/// resolved per search through a secret provider.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML override for the built-in brand list.
    pub brands_path: Option<PathBuf>,
    pub mapbox_base_url: String,
    pub places_endpoint: PlacesEndpoint,
    pub request_timeout_secs: u64,
    pub geocode_deadline_secs: u64,
    pub results_per_brand: u32,
    pub default_radius_miles: u32,
    /// Radii (miles) a front end may request, ascending.
    pub allowed_radii: Vec<u32>,
    pub match_policy: MatchPolicy,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub audit_log_path: Option<PathBuf>,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Returns `true` if `radius` is one of the configured radii.
    #[must_use]
    pub fn is_allowed_radius(&self, radius: u32) -> bool {
        self.allowed_radii.contains(&radius)
    }
}
