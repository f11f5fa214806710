use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::AppConfig;
use crate::ConfigError;

/// One retail chain the pipeline searches for, and the text sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandQuery {
    pub label: String,
    /// Free-text search term; defaults to `label` when omitted in YAML.
    #[serde(default)]
    pub search_term: String,
}

impl BrandQuery {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            search_term: label.to_string(),
        }
    }

    /// Generate a URL-safe slug from the brand label.
    #[must_use]
    pub fn slug(&self) -> String {
        self.label
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandQuery>,
}

const DEFAULT_BRAND_LABELS: &[&str] = &[
    "Kroger",
    "Albertsons",
    "Publix",
    "Safeway",
    "Food Lion",
    "Dollar Tree",
    "Dollar General",
    "Family Dollar",
    "Five Below",
    "99 Cents Only",
    "Walmart",
    "Michaels",
    "CVS",
];

/// The built-in brand list used when no brands file is configured.
#[must_use]
pub fn default_brands() -> Vec<BrandQuery> {
    DEFAULT_BRAND_LABELS
        .iter()
        .map(|label| BrandQuery::new(label))
        .collect()
}

/// The brand list for `config`: the YAML file at `brands_path` when set,
/// otherwise [`default_brands`].
///
/// # Errors
///
/// Same as [`load_brands`].
pub fn configured_brands(config: &AppConfig) -> Result<Vec<BrandQuery>, ConfigError> {
    match &config.brands_path {
        Some(path) => load_brands(path),
        None => Ok(default_brands()),
    }
}

/// Load and validate the brands configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<Vec<BrandQuery>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_brands(&content)
}

fn parse_brands(content: &str) -> Result<Vec<BrandQuery>, ConfigError> {
    let brands_file: BrandsFile =
        serde_yaml::from_str(content).map_err(ConfigError::BrandsFileParse)?;

    let brands: Vec<BrandQuery> = brands_file
        .brands
        .into_iter()
        .map(|mut brand| {
            brand.label = brand.label.trim().to_string();
            brand.search_term = brand.search_term.trim().to_string();
            if brand.search_term.is_empty() {
                brand.search_term.clone_from(&brand.label);
            }
            brand
        })
        .collect();

    validate_brands(&brands)?;

    Ok(brands)
}

fn validate_brands(brands: &[BrandQuery]) -> Result<(), ConfigError> {
    if brands.is_empty() {
        return Err(ConfigError::Validation(
            "at least one brand must be configured".to_string(),
        ));
    }

    let mut seen_labels = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for brand in brands {
        if brand.label.is_empty() {
            return Err(ConfigError::Validation(
                "brand label must be non-empty".to_string(),
            ));
        }

        if !seen_labels.insert(brand.label.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand label: '{}'",
                brand.label
            )));
        }

        let slug = brand.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' produces an empty slug",
                brand.label
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
