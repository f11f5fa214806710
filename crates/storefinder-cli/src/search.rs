//! Command handlers for `search` and `brands`.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use storefinder_core::{configured_brands, AppConfig, BrandQuery};
use storefinder_mapbox::MapboxClient;
use storefinder_search::{
    sink_for_config, EnvSecretProvider, SearchError, SearchOutcome, SearchSettings, StoreSearch,
};

/// How long the CLI waits for the audit record before exiting.
const AUDIT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the store search pipeline against Mapbox and print the result.
///
/// # Errors
///
/// Returns an error for a radius outside the allowed set, a missing
/// `MAPBOX_TOKEN`, an invalid or unknown ZIP code, or a geocoding outage.
/// Individual brand failures are reported on stderr, not returned.
pub(crate) async fn run_search(
    config: &AppConfig,
    zip: &str,
    radius: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let radius = resolve_radius(config, radius)?;
    let brands = configured_brands(config)?;
    tracing::debug!(zip, radius, brands = brands.len(), "running store search");
    let client = MapboxClient::from_app_config(config)?;

    let search = StoreSearch::new(
        client.clone(),
        client,
        Arc::new(EnvSecretProvider::default()),
        brands,
    )
    .with_settings(SearchSettings::from_app_config(config))
    .with_audit_sink(sink_for_config(config));

    let outcome = match search
        .run_and_record(zip, f64::from(radius), AUDIT_WRITE_TIMEOUT)
        .await
    {
        Ok(outcome) => outcome,
        Err(SearchError::NotFound(code)) => {
            anyhow::bail!("no location found for ZIP code {code}")
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_outcome(&outcome));
    }

    for brand in &outcome.failed_brands {
        eprintln!("warning: search for {brand} failed; its stores are missing");
    }

    Ok(())
}

/// Print the configured brand list.
///
/// # Errors
///
/// Returns an error if the brands file cannot be loaded.
pub(crate) fn list_brands(config: &AppConfig) -> anyhow::Result<()> {
    let brands = configured_brands(config)?;
    print!("{}", format_brands(&brands));
    Ok(())
}

pub(crate) fn resolve_radius(config: &AppConfig, radius: Option<u32>) -> anyhow::Result<u32> {
    let radius = radius.unwrap_or(config.default_radius_miles);
    if !config.is_allowed_radius(radius) {
        anyhow::bail!(
            "radius {radius} is not allowed; choose one of {:?}",
            config.allowed_radii
        );
    }
    Ok(radius)
}

pub(crate) fn format_outcome(outcome: &SearchOutcome) -> String {
    let location = &outcome.location;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Stores within {} miles of {}, {} {}",
        outcome.radius_miles, location.city, location.state, location.postal_code
    );

    if let Some(message) = outcome.message() {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<32} {:<16} {:>8}  Address",
        "Name", "Brand", "Miles"
    );
    for store in &outcome.stores {
        let _ = writeln!(
            out,
            "  {:<32} {:<16} {:>8.1}  {}",
            truncate(&store.name, 32),
            truncate(&store.brand, 16),
            store.distance_miles,
            store.address
        );
    }
    out
}

pub(crate) fn format_brands(brands: &[BrandQuery]) -> String {
    let mut out = String::new();
    for brand in brands {
        if brand.search_term == brand.label {
            let _ = writeln!(out, "  {}", brand.label);
        } else {
            let _ = writeln!(out, "  {:<20} (searches \"{}\")", brand.label, brand.search_term);
        }
    }
    out
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('\u{2026}');
        cut
    }
}
