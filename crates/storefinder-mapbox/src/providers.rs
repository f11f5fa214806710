use storefinder_core::{
    normalize_postal_code, AccessToken, CandidateStore, GeocodeError, Geocoder, PlacesError,
    PlacesQuery, PlacesSearch, SearchLocation,
};

use crate::client::MapboxClient;
use crate::error::MapboxError;

impl Geocoder for MapboxClient {
    async fn geocode(
        &self,
        token: &AccessToken,
        postal_code: &str,
    ) -> Result<SearchLocation, GeocodeError> {
        let postal_code = normalize_postal_code(postal_code)?;

        match self.geocode_postal_code(token, postal_code).await {
            Ok(Some(location)) => Ok(location),
            Ok(None) => Err(GeocodeError::NotFound(postal_code.to_string())),
            Err(e) => {
                tracing::warn!(postal_code, error = %e, "postal code lookup failed");
                Err(GeocodeError::ServiceUnavailable(e.to_string()))
            }
        }
    }
}

impl PlacesSearch for MapboxClient {
    async fn search(
        &self,
        token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, PlacesError> {
        self.search_places(token, query).await.map_err(PlacesError::from)
    }
}

impl From<MapboxError> for PlacesError {
    fn from(err: MapboxError) -> Self {
        match err {
            MapboxError::UnexpectedStatus { status, .. } => PlacesError::Status { status },
            MapboxError::Deserialize { .. } => PlacesError::Decode(err.to_string()),
            MapboxError::Http(_) | MapboxError::InvalidBaseUrl { .. } => {
                PlacesError::Transport(err.to_string())
            }
        }
    }
}
