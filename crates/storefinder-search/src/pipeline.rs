//! The store search pipeline.
//!
//! postal code → geocode (with deadline) → bounding box → concurrent
//! per-brand places search → relevance filter → distance sort.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storefinder_core::{
    normalize_postal_code, AppConfig, BrandQuery, Geocoder, MatchPolicy, PlacesSearch,
    SearchLocation, Store,
};

use crate::audit::{AuditRecord, AuditSink, NoopAuditSink};
use crate::error::SearchError;
use crate::fanout::{flatten, search_brands, FanoutOptions};
use crate::finalize::finalize;
use crate::secrets::SecretProvider;

/// Shown when a search succeeds but finds nothing.
pub const EMPTY_RESULTS_MESSAGE: &str =
    "No stores found near this location. Consider widening the search radius.";

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub results_per_brand: u32,
    pub match_policy: MatchPolicy,
    pub geocode_deadline: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            results_per_brand: 5,
            match_policy: MatchPolicy::default(),
            geocode_deadline: Duration::from_secs(10),
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            results_per_brand: config.results_per_brand,
            match_policy: config.match_policy,
            geocode_deadline: Duration::from_secs(config.geocode_deadline_secs),
        }
    }
}

/// Result of one completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub location: SearchLocation,
    /// The radius that produced the bounding box.
    pub radius_miles: f64,
    /// Sorted nearest first.
    pub stores: Vec<Store>,
    /// Labels of brands whose search failed and contributed nothing.
    pub failed_brands: Vec<String>,
}

impl SearchOutcome {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// [`EMPTY_RESULTS_MESSAGE`] when no stores were found.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_RESULTS_MESSAGE)
    }
}

/// Store search over a geocoder and a places provider.
pub struct StoreSearch<G, P> {
    geocoder: G,
    places: P,
    secrets: Arc<dyn SecretProvider>,
    brands: Vec<BrandQuery>,
    settings: SearchSettings,
    audit: Arc<dyn AuditSink>,
}

impl<G: Geocoder, P: PlacesSearch> StoreSearch<G, P> {
    #[must_use]
    pub fn new(
        geocoder: G,
        places: P,
        secrets: Arc<dyn SecretProvider>,
        brands: Vec<BrandQuery>,
    ) -> Self {
        Self {
            geocoder,
            places,
            secrets,
            brands,
            settings: SearchSettings::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    #[must_use]
    pub fn brands(&self) -> &[BrandQuery] {
        &self.brands
    }

    #[must_use]
    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    /// Run a full search for `postal_code` within `radius_miles`.
    ///
    /// Input is validated and the access token resolved before any upstream
    /// call. Per-brand failures degrade to missing results; only
    /// configuration, input and geocoding failures are returned. The audit
    /// record is written on a detached task, so a caller that shuts its
    /// runtime down right after should use [`StoreSearch::run_and_record`].
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidRadius`] for a non-positive or non-finite radius.
    /// - [`SearchError::InvalidPostalCode`] for anything but five digits.
    /// - [`SearchError::Configuration`] when no access token is available.
    /// - [`SearchError::NotFound`] when the postal code does not resolve.
    /// - [`SearchError::ServiceUnavailable`] when geocoding fails or times out.
    pub async fn run(
        &self,
        postal_code: &str,
        radius_miles: f64,
    ) -> Result<SearchOutcome, SearchError> {
        let outcome = self.search(postal_code, radius_miles).await?;
        self.spawn_audit(&outcome);
        Ok(outcome)
    }

    /// Like [`StoreSearch::run`], but waits up to `audit_timeout` for the
    /// audit record to be written before returning.
    ///
    /// A failed or late audit write is logged and does not fail the search.
    ///
    /// # Errors
    ///
    /// Same as [`StoreSearch::run`].
    pub async fn run_and_record(
        &self,
        postal_code: &str,
        radius_miles: f64,
        audit_timeout: Duration,
    ) -> Result<SearchOutcome, SearchError> {
        let outcome = self.search(postal_code, radius_miles).await?;
        let record = AuditRecord::from_outcome(&outcome, chrono::Utc::now());
        match tokio::time::timeout(audit_timeout, self.audit.record(record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to write search audit record"),
            Err(_) => tracing::warn!(
                timeout_ms = u64::try_from(audit_timeout.as_millis()).unwrap_or(u64::MAX),
                "search audit record not written before timeout"
            ),
        }
        Ok(outcome)
    }

    async fn search(
        &self,
        postal_code: &str,
        radius_miles: f64,
    ) -> Result<SearchOutcome, SearchError> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(SearchError::InvalidRadius(format!(
                "radius must be a positive number of miles, got {radius_miles}"
            )));
        }
        let postal_code = normalize_postal_code(postal_code)?;

        let token = self
            .secrets
            .access_token()
            .map_err(|e| SearchError::Configuration(e.to_string()))?;

        let deadline = self.settings.geocode_deadline;
        let location =
            match tokio::time::timeout(deadline, self.geocoder.geocode(&token, postal_code)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!(
                        postal_code,
                        deadline_secs = deadline.as_secs(),
                        "geocoding deadline exceeded"
                    );
                    return Err(SearchError::ServiceUnavailable(format!(
                        "geocoding did not respond within {}s",
                        deadline.as_secs()
                    )));
                }
            };

        let options = FanoutOptions {
            limit: self.settings.results_per_brand,
            policy: self.settings.match_policy,
        };
        let groups = search_brands(
            &self.places,
            &token,
            &location,
            radius_miles,
            &self.brands,
            options,
        )
        .await;

        let failed_brands: Vec<String> = groups
            .iter()
            .filter(|g| !g.succeeded())
            .map(|g| g.brand.label.clone())
            .collect();
        let stores = finalize(location.coordinate, flatten(groups));

        tracing::info!(
            postal_code,
            radius_miles,
            brands = self.brands.len(),
            failed = failed_brands.len(),
            count = stores.len(),
            "store search complete"
        );

        Ok(SearchOutcome {
            location,
            radius_miles,
            stores,
            failed_brands,
        })
    }

    fn spawn_audit(&self, outcome: &SearchOutcome) {
        let record = AuditRecord::from_outcome(outcome, chrono::Utc::now());
        let sink = Arc::clone(&self.audit);
        tokio::spawn(async move {
            if let Err(e) = sink.record(record).await {
                tracing::warn!(error = %e, "failed to write search audit record");
            }
        });
    }
}
