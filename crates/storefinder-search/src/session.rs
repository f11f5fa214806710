//! Last-search-wins coordination.
//!
//! A front end that lets the user re-submit while a search is in flight
//! runs each execution through one [`SearchSession`]. Each run takes a
//! generation ticket; when it finishes, its result is committed only if no
//! newer run has started in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};

use storefinder_core::{Geocoder, PlacesSearch};

use crate::error::SearchError;
use crate::pipeline::{SearchOutcome, StoreSearch};

/// Generation marker handed out by [`SearchSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    latest: AtomicU64,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the latest generation.
    pub fn commit<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest.load(Ordering::SeqCst),
                "discarding stale search result"
            );
            None
        }
    }

    /// Run `search` under a fresh ticket.
    ///
    /// Returns `None` when a newer run started before this one finished;
    /// its result, success or error, is dropped.
    pub async fn run<G: Geocoder, P: PlacesSearch>(
        &self,
        search: &StoreSearch<G, P>,
        postal_code: &str,
        radius_miles: f64,
    ) -> Option<Result<SearchOutcome, SearchError>> {
        let ticket = self.begin();
        let result = search.run(postal_code, radius_miles).await;
        self.commit(ticket, result)
    }
}
