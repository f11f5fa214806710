use storefinder_core::{haversine_miles, CandidateStore, Coordinate, Store, PHONE_PLACEHOLDER};

/// Turn brand-attributed candidates into [`Store`]s sorted by distance from
/// `center`, nearest first.
///
/// The sort is stable: equidistant stores keep their input order. No
/// cross-brand deduplication is done.
#[must_use]
pub fn finalize(center: Coordinate, candidates: Vec<(CandidateStore, String)>) -> Vec<Store> {
    let mut stores: Vec<Store> = candidates
        .into_iter()
        .map(|(candidate, brand)| Store {
            distance_miles: haversine_miles(center, candidate.coordinate),
            id: candidate.external_id,
            name: candidate.raw_name,
            address: candidate.full_address,
            phone: PHONE_PLACEHOLDER.to_string(),
            latitude: candidate.coordinate.latitude,
            longitude: candidate.coordinate.longitude,
            brand,
        })
        .collect();

    stores.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    stores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::candidate;

    fn center() -> Coordinate {
        Coordinate::new(42.3314, -83.0458)
    }

    #[test]
    fn output_is_sorted_by_distance() {
        let input = vec![
            (candidate("far", "Kroger", 42.50, -83.0458), "Kroger".to_string()),
            (candidate("near", "CVS", 42.34, -83.0458), "CVS".to_string()),
            (candidate("mid", "Publix", 42.40, -83.0458), "Publix".to_string()),
        ];
        let stores = finalize(center(), input);
        let ids: Vec<&str> = stores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["near", "mid", "far"]);
        assert!(stores
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn ties_keep_input_order() {
        let input = vec![
            (candidate("first", "Kroger", 42.40, -83.0458), "Kroger".to_string()),
            (candidate("second", "Safeway", 42.40, -83.0458), "Safeway".to_string()),
        ];
        let stores = finalize(center(), input);
        assert_eq!(stores[0].id, "first");
        assert_eq!(stores[1].id, "second");
    }

    #[test]
    fn fills_placeholder_phone_and_keeps_brand() {
        let stores = finalize(
            center(),
            vec![(candidate("x", "Michaels", 42.35, -83.05), "Michaels".to_string())],
        );
        assert_eq!(stores[0].phone, PHONE_PLACEHOLDER);
        assert_eq!(stores[0].brand, "Michaels");
        assert!(
            (stores[0].distance_miles - haversine_miles(center(), Coordinate::new(42.35, -83.05)))
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn same_id_under_two_brands_is_not_deduplicated() {
        let stores = finalize(
            center(),
            vec![
                (candidate("poi.1", "Dollar Tree", 42.34, -83.04), "Dollar Tree".to_string()),
                (candidate("poi.1", "Dollar Tree", 42.34, -83.04), "Dollar General".to_string()),
            ],
        );
        assert_eq!(stores.len(), 2);
        assert_ne!(stores[0].key(), stores[1].key());
    }
}
