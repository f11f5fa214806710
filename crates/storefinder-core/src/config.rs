use crate::app_config::{AppConfig, Environment, PlacesEndpoint};
use crate::relevance::MatchPolicy;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;

    let bind_addr = or_default("STOREFINDER_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOREFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", "info");
    let brands_path = optional("STOREFINDER_BRANDS_PATH").map(PathBuf::from);

    let mapbox_base_url = or_default("STOREFINDER_MAPBOX_BASE_URL", "https://api.mapbox.com/");
    if !(mapbox_base_url.starts_with("http://") || mapbox_base_url.starts_with("https://")) {
        return Err(invalid(
            "STOREFINDER_MAPBOX_BASE_URL",
            format!("expected an http(s) URL, got '{mapbox_base_url}'"),
        ));
    }
    let places_endpoint = parse_places_endpoint(&or_default("STOREFINDER_PLACES_ENDPOINT", "geocoding"))?;

    let request_timeout_secs = parse_u64("STOREFINDER_REQUEST_TIMEOUT_SECS", "10")?;
    let geocode_deadline_secs = parse_u64("STOREFINDER_GEOCODE_DEADLINE_SECS", "10")?;
    if geocode_deadline_secs == 0 {
        return Err(invalid(
            "STOREFINDER_GEOCODE_DEADLINE_SECS",
            "deadline must be at least 1 second".to_string(),
        ));
    }

    // Mapbox caps `limit` at 10 for both endpoint families.
    let results_per_brand = parse_u32("STOREFINDER_RESULTS_PER_BRAND", "5")?;
    if !(1..=10).contains(&results_per_brand) {
        return Err(invalid(
            "STOREFINDER_RESULTS_PER_BRAND",
            format!("must be between 1 and 10, got {results_per_brand}"),
        ));
    }

    let allowed_radii = parse_radii(&or_default("STOREFINDER_ALLOWED_RADII", "5,10,20,40,60"))?;
    let default_radius_miles = parse_u32("STOREFINDER_DEFAULT_RADIUS_MILES", "10")?;
    if !allowed_radii.contains(&default_radius_miles) {
        return Err(invalid(
            "STOREFINDER_DEFAULT_RADIUS_MILES",
            format!("{default_radius_miles} is not one of the allowed radii {allowed_radii:?}"),
        ));
    }

    let match_policy = parse_match_policy(&or_default("STOREFINDER_MATCH_POLICY", "any_token"))?;
    let max_retries = parse_u32("STOREFINDER_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("STOREFINDER_RETRY_BACKOFF_BASE_MS", "250")?;
    let audit_log_path = optional("STOREFINDER_AUDIT_LOG_PATH").map(PathBuf::from);
    let rate_limit_per_minute = parse_usize("STOREFINDER_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        brands_path,
        mapbox_base_url,
        places_endpoint,
        request_timeout_secs,
        geocode_deadline_secs,
        results_per_brand,
        default_radius_miles,
        allowed_radii,
        match_policy,
        max_retries,
        retry_backoff_base_ms,
        audit_log_path,
        rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_places_endpoint(s: &str) -> Result<PlacesEndpoint, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "geocoding" => Ok(PlacesEndpoint::Geocoding),
        "searchbox" => Ok(PlacesEndpoint::SearchBox),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_PLACES_ENDPOINT".to_string(),
            reason: format!("expected 'geocoding' or 'searchbox', got '{other}'"),
        }),
    }
}

fn parse_match_policy(s: &str) -> Result<MatchPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "any_token" => Ok(MatchPolicy::AnyToken),
        "full_term" => Ok(MatchPolicy::FullTerm),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_MATCH_POLICY".to_string(),
            reason: format!("expected 'any_token' or 'full_term', got '{other}'"),
        }),
    }
}

/// Parse a comma-separated radius list into a sorted, de-duplicated set of
/// positive mile values.
fn parse_radii(raw: &str) -> Result<Vec<u32>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "STOREFINDER_ALLOWED_RADII".to_string(),
        reason,
    };

    let mut radii = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| invalid(format!("'{s}': {e}")))
        })
        .collect::<Result<Vec<u32>, ConfigError>>()?;

    if radii.is_empty() {
        return Err(invalid("at least one radius is required".to_string()));
    }
    if radii.contains(&0) {
        return Err(invalid("radius must be positive".to_string()));
    }

    radii.sort_unstable();
    radii.dedup();
    Ok(radii)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
