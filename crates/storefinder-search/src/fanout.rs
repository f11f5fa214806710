//! Concurrent per-brand places search.
//!
//! Every brand query runs at once and the fan-out waits for all of them. A
//! failing branch contributes an empty [`BrandResults`] and is logged; it
//! never fails the search as a whole.

use futures::future::join_all;
use storefinder_core::{
    bounding_box, is_relevant, AccessToken, BrandQuery, CandidateStore, MatchPolicy, PlacesQuery,
    PlacesSearch, SearchLocation,
};

/// Per-search knobs for the fan-out.
#[derive(Debug, Clone, Copy)]
pub struct FanoutOptions {
    /// Upstream result limit per brand.
    pub limit: u32,
    pub policy: MatchPolicy,
}

impl Default for FanoutOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            policy: MatchPolicy::default(),
        }
    }
}

/// Outcome of one brand branch.
#[derive(Debug, Clone)]
pub struct BrandResults {
    pub brand: BrandQuery,
    /// Candidates that passed the relevance filter, in upstream order.
    pub candidates: Vec<CandidateStore>,
    /// Candidates returned upstream before filtering.
    pub raw_count: usize,
    /// Set when the branch failed and contributed nothing.
    pub error: Option<String>,
}

impl BrandResults {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Query `places` once per brand around `location`, all concurrently.
///
/// Results come back in the order of `brands`. Each branch applies the
/// relevance filter to its own candidates.
pub async fn search_brands<P: PlacesSearch>(
    places: &P,
    token: &AccessToken,
    location: &SearchLocation,
    radius_miles: f64,
    brands: &[BrandQuery],
    options: FanoutOptions,
) -> Vec<BrandResults> {
    let bbox = bounding_box(location.coordinate, radius_miles);

    let branches = brands.iter().map(|brand| async move {
        let query = PlacesQuery {
            term: &brand.search_term,
            proximity: location.coordinate,
            bbox: Some(bbox),
            limit: options.limit,
        };

        match places.search(token, &query).await {
            Ok(raw) => {
                let raw_count = raw.len();
                let candidates: Vec<CandidateStore> = raw
                    .into_iter()
                    .filter(|c| is_relevant(c, brand, options.policy))
                    .collect();
                if candidates.is_empty() {
                    tracing::debug!(brand = %brand.label, raw_count, "no relevant stores for brand");
                }
                BrandResults {
                    brand: brand.clone(),
                    candidates,
                    raw_count,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(brand = %brand.label, error = %e, "brand search failed, skipping");
                BrandResults {
                    brand: brand.clone(),
                    candidates: Vec::new(),
                    raw_count: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    });

    join_all(branches).await
}

/// Flatten grouped results into `(candidate, brand label)` pairs, keeping
/// brand order and per-brand upstream order.
#[must_use]
pub fn flatten(results: Vec<BrandResults>) -> Vec<(CandidateStore, String)> {
    results
        .into_iter()
        .flat_map(|group| {
            let label = group.brand.label;
            group
                .candidates
                .into_iter()
                .map(move |candidate| (candidate, label.clone()))
        })
        .collect()
}

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;
