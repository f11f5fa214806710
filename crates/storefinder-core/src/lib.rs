pub mod app_config;
pub mod brands;
pub mod config;
pub mod geo;
pub mod providers;
pub mod relevance;
pub mod types;

pub use app_config::{AppConfig, Environment, PlacesEndpoint};
pub use brands::{configured_brands, default_brands, load_brands, BrandQuery, BrandsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{bounding_box, haversine_miles, BoundingBox, Coordinate};
pub use providers::{
    normalize_postal_code, AccessToken, GeocodeError, Geocoder, PlacesError, PlacesQuery,
    PlacesSearch,
};
pub use relevance::{is_relevant, MatchPolicy, EXCLUDED_SUBSTORES};
pub use types::{CandidateStore, SearchLocation, Store, PHONE_PLACEHOLDER};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("brands validation failed: {0}")]
    Validation(String),
}
