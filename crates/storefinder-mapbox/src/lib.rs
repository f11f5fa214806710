//! Mapbox adapters for the store search pipeline.
//!
//! [`MapboxClient`] implements both [`storefinder_core::Geocoder`] (postal
//! code lookup through Geocoding v5) and [`storefinder_core::PlacesSearch`]
//! (per-brand POI search through either Geocoding v5 or Search Box v1).

pub mod client;
pub mod error;
mod parse;
mod providers;
mod retry;
pub mod types;

pub use client::MapboxClient;
pub use error::MapboxError;
