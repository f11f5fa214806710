//! Store search pipeline: geocode a postal code, fan out one places search
//! per brand, filter, measure and sort.
//!
//! [`StoreSearch`] is generic over the [`storefinder_core::Geocoder`] and
//! [`storefinder_core::PlacesSearch`] seams. The Mapbox adapters live in
//! `storefinder-mapbox`; [`stub`] provides deterministic in-memory ones for tests.

pub mod audit;
pub mod error;
pub mod fanout;
pub mod finalize;
pub mod pipeline;
pub mod presenter;
pub mod secrets;
pub mod session;
pub mod stub;

pub use audit::{
    sink_for_config, AuditError, AuditRecord, AuditSink, JsonlAuditSink, NoopAuditSink,
    TracingAuditSink,
};
pub use error::SearchError;
pub use fanout::{search_brands, BrandResults, FanoutOptions};
pub use finalize::finalize;
pub use pipeline::{SearchOutcome, SearchSettings, StoreSearch, EMPTY_RESULTS_MESSAGE};
pub use presenter::{Marker, MarkerBoard, MarkerSurface};
pub use secrets::{EnvSecretProvider, SecretProvider, StaticSecretProvider, MAPBOX_TOKEN_VAR};
pub use session::{SearchSession, Ticket};
