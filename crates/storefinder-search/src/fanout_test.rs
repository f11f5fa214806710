use storefinder_core::{Coordinate, PlacesError};

use super::*;
use crate::stub::{candidate, StubPlaces};

fn detroit() -> SearchLocation {
    SearchLocation {
        coordinate: Coordinate::new(42.3314, -83.0458),
        city: "Detroit".to_string(),
        state: "MI".to_string(),
        postal_code: "48201".to_string(),
    }
}

fn token() -> AccessToken {
    AccessToken::new("pk.test").expect("token")
}

#[tokio::test]
async fn failing_branch_leaves_other_brands_intact() {
    let brands = vec![
        BrandQuery::new("Kroger"),
        BrandQuery::new("Publix"),
        BrandQuery::new("CVS"),
    ];
    let places = StubPlaces::new()
        .with_results("Kroger", vec![candidate("k1", "Kroger", 42.34, -83.04)])
        .with_failure("Publix", PlacesError::Status { status: 500 })
        .with_results("CVS", vec![candidate("c1", "CVS Pharmacy", 42.33, -83.05)]);

    let results = search_brands(
        &places,
        &token(),
        &detroit(),
        10.0,
        &brands,
        FanoutOptions::default(),
    )
    .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].brand.label, "Kroger");
    assert_eq!(results[0].candidates.len(), 1);
    assert!(results[0].succeeded());

    assert!(!results[1].succeeded());
    assert!(results[1].candidates.is_empty());

    // "CVS Pharmacy" is a sub-department and is filtered out.
    assert!(results[2].succeeded());
    assert_eq!(results[2].raw_count, 1);
    assert!(results[2].candidates.is_empty());
}

#[tokio::test]
async fn every_brand_is_queried_once() {
    let brands = vec![BrandQuery::new("Food Lion"), BrandQuery::new("Five Below")];
    let places = StubPlaces::new();

    let results = search_brands(
        &places,
        &token(),
        &detroit(),
        5.0,
        &brands,
        FanoutOptions::default(),
    )
    .await;

    assert_eq!(results.len(), 2);
    let mut terms = places.queried_terms();
    terms.sort();
    assert_eq!(terms, ["Five Below", "Food Lion"]);
}

#[tokio::test]
async fn full_term_policy_is_stricter_than_any_token() {
    let brands = vec![BrandQuery::new("Dollar General")];
    let places = StubPlaces::new().with_results(
        "Dollar General",
        vec![
            candidate("a", "Dollar General", 42.34, -83.04),
            candidate("b", "Dollar Tree", 42.34, -83.04),
        ],
    );

    let any = search_brands(
        &places,
        &token(),
        &detroit(),
        10.0,
        &brands,
        FanoutOptions::default(),
    )
    .await;
    assert_eq!(any[0].candidates.len(), 2);

    let strict = search_brands(
        &places,
        &token(),
        &detroit(),
        10.0,
        &brands,
        FanoutOptions {
            limit: 5,
            policy: MatchPolicy::FullTerm,
        },
    )
    .await;
    assert_eq!(strict[0].candidates.len(), 1);
    assert_eq!(strict[0].candidates[0].external_id, "a");
}

#[test]
fn flatten_attributes_each_candidate_to_its_brand() {
    let groups = vec![
        BrandResults {
            brand: BrandQuery::new("Kroger"),
            candidates: vec![candidate("k1", "Kroger", 0.0, 0.0)],
            raw_count: 1,
            error: None,
        },
        BrandResults {
            brand: BrandQuery::new("Walmart"),
            candidates: vec![
                candidate("w1", "Walmart", 0.0, 0.0),
                candidate("w2", "Walmart", 0.0, 0.0),
            ],
            raw_count: 2,
            error: None,
        },
    ];

    let flat = flatten(groups);
    let pairs: Vec<(&str, &str)> = flat
        .iter()
        .map(|(c, brand)| (c.external_id.as_str(), brand.as_str()))
        .collect();
    assert_eq!(pairs, [("k1", "Kroger"), ("w1", "Walmart"), ("w2", "Walmart")]);
}

/// Answers every query after a fixed delay, tracking how many calls overlap.
struct SlowPlaces {
    delay: std::time::Duration,
    in_flight: std::sync::atomic::AtomicUsize,
    peak: std::sync::atomic::AtomicUsize,
}

impl SlowPlaces {
    fn new(delay: std::time::Duration) -> Self {
        Self {
            delay,
            in_flight: std::sync::atomic::AtomicUsize::new(0),
            peak: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl PlacesSearch for SlowPlaces {
    async fn search(
        &self,
        _token: &AccessToken,
        query: &PlacesQuery<'_>,
    ) -> Result<Vec<CandidateStore>, PlacesError> {
        use std::sync::atomic::Ordering;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![candidate("p1", query.term, 42.33, -83.04)])
    }
}

#[tokio::test(start_paused = true)]
async fn brand_queries_run_concurrently() {
    let brands = storefinder_core::default_brands();
    let places = SlowPlaces::new(std::time::Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    let results = search_brands(
        &places,
        &token(),
        &detroit(),
        10.0,
        &brands,
        FanoutOptions::default(),
    )
    .await;
    let elapsed = started.elapsed();

    assert_eq!(results.len(), brands.len());
    assert!(results.iter().all(BrandResults::succeeded));
    assert!(
        elapsed < std::time::Duration::from_secs(2),
        "{} one-second queries took {elapsed:?}",
        brands.len()
    );
    assert_eq!(
        places.peak.load(std::sync::atomic::Ordering::SeqCst),
        brands.len()
    );
}
