//! Domain types that flow through a single store search.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Upstream places data carries no phone numbers.
pub const PHONE_PLACEHOLDER: &str = "(Call store for details)";

/// The resolved center of one search, produced by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocation {
    pub coordinate: Coordinate,
    pub city: String,
    /// Two-letter state code, e.g. `"MI"`. Empty when the geocoder could not
    /// determine it.
    pub state: String,
    pub postal_code: String,
}

/// A raw places result before relevance filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStore {
    /// Provider place id. Only unique within one query's results.
    pub external_id: String,
    pub raw_name: String,
    pub full_address: String,
    pub coordinate: Coordinate,
}

/// A store in the final, distance-sorted result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Label of the brand query that produced this store.
    pub brand: String,
    pub distance_miles: f64,
}

impl Store {
    /// Stable per-render key. Provider ids can repeat across brand queries,
    /// so the brand is part of the key.
    #[must_use]
    pub fn key(&self) -> String {
        let brand_slug = crate::brands::BrandQuery::new(&self.brand).slug();
        format!("{brand_slug}:{}", self.id)
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
