//! Name-based relevance filter for places results.
//!
//! Text search upstream is fuzzy: a query for "Dollar General" happily
//! returns unrelated POIs, and a query for "Walmart" returns the pharmacy,
//! fuel station, and money center as separate places. This filter is
//! best-effort: it keeps results whose name looks like the brand and drops
//! known in-store sub-departments.

use serde::{Deserialize, Serialize};

use crate::brands::BrandQuery;
use crate::types::CandidateStore;

/// Sub-department names that are never the store itself. Matched as
/// case-folded substrings of the candidate name, for every brand.
pub const EXCLUDED_SUBSTORES: &[&str] = &[
    "pharmacy",
    "fuel center",
    "fuel station",
    "gas station",
    "money center",
    "moneycenter",
    "financial",
    "lending",
    "garden center",
    "auto care",
    "tire & lube",
    "vision center",
    "photo center",
    "optical",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Accept if the name contains any whitespace token of the search term.
    #[default]
    AnyToken,
    /// Accept only if the name contains the whole search term.
    FullTerm,
}

/// Decide whether `candidate` plausibly is a `brand` store.
#[must_use]
pub fn is_relevant(candidate: &CandidateStore, brand: &BrandQuery, policy: MatchPolicy) -> bool {
    let name = candidate.raw_name.to_lowercase();
    let term = brand.search_term.to_lowercase();

    if EXCLUDED_SUBSTORES.iter().any(|excluded| name.contains(excluded)) {
        return false;
    }

    match policy {
        MatchPolicy::AnyToken => term.split_whitespace().any(|token| name.contains(token)),
        MatchPolicy::FullTerm => {
            let term = term.trim();
            !term.is_empty() && name.contains(term)
        }
    }
}
