//! Geographic primitives: coordinates, bounding boxes, and great-circle distance.
//!
//! All distances are in statute miles. The bounding box uses the flat
//! "69 miles per degree of latitude" approximation with a cosine correction
//! for longitude, which is accurate enough for search radii of tens of miles.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

const MILES_PER_LAT_DEGREE: f64 = 69.0;
const EARTH_RADIUS_MILES: f64 = 3959.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate from a GeoJSON-style `[longitude, latitude]` pair,
    /// rejecting out-of-range or non-finite values.
    #[must_use]
    pub fn from_lon_lat(pair: [f64; 2]) -> Option<Self> {
        let coord = Self::new(pair[1], pair[0]);
        coord.is_valid().then_some(coord)
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// `true` if `other` lies strictly inside `self` on all four edges.
    #[must_use]
    pub fn strictly_contains(&self, other: &BoundingBox) -> bool {
        self.min_lon < other.min_lon
            && self.min_lat < other.min_lat
            && self.max_lon > other.max_lon
            && self.max_lat > other.max_lat
    }

    #[must_use]
    pub fn contains_point(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }

    /// Mapbox `bbox` parameter form: `minLon,minLat,maxLon,maxLat`.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Rectangle of roughly `radius_miles` around `center`.
///
/// Callers are expected to pass a positive radius; a zero radius yields a
/// degenerate box collapsed onto the center.
#[must_use]
pub fn bounding_box(center: Coordinate, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles / MILES_PER_LAT_DEGREE;
    let lon_delta = lat_delta / (center.latitude * PI / 180.0).cos();

    BoundingBox {
        min_lon: center.longitude - lon_delta,
        min_lat: center.latitude - lat_delta,
        max_lon: center.longitude + lon_delta,
        max_lat: center.latitude + lat_delta,
    }
}

/// Great-circle distance between two points in miles.
#[must_use]
pub fn haversine_miles(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}
