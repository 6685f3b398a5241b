//! Catalogue definition file: which upstream categories to crawl and the
//! field-name policy used to reconcile prices.
//!
//! ```yaml
//! categories:
//!   - name: Clearance
//!     id: f0bd591d50912ba015ed5fb814c42bbb
//!   - name: Cookware
//!     id: 0a1b2c
//!     path: [Home, Kitchen, Cookware]
//! pricing:
//!   fallback_fields: [was_price, list_price, regular_price]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One upstream browse grouping to crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    /// Opaque upstream group identifier.
    pub id: String,
    /// Optional multi-level category path. When present the output category
    /// column carries its last two segments instead of `name`.
    #[serde(default)]
    pub path: Vec<String>,
}

impl CategorySpec {
    /// The value written to the `category` column for every row in this
    /// category.
    #[must_use]
    pub fn label(&self) -> String {
        let segments: Vec<&str> = self
            .path
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return self.name.clone();
        }
        let start = segments.len().saturating_sub(2);
        segments[start..].join(" > ")
    }

    /// Matches a CLI filter against the category name (case-insensitive) or id.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.id == filter || self.name.eq_ignore_ascii_case(filter)
    }
}

/// Upstream field names consulted by the price resolver, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Field carrying the current selling price.
    pub price_field: String,
    /// Free-form marketing text such as `"Save $5"` or `"Was $25"`.
    pub discount_text_field: String,
    /// Former-price fields; the largest parsable value is the candidate.
    pub fallback_fields: Vec<String>,
    /// Words marking discount text as an amount saved rather than a former
    /// price. Matched case-insensitively against whole words.
    pub savings_markers: Vec<String>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            price_field: "price".to_string(),
            discount_text_field: "SavePrice".to_string(),
            fallback_fields: vec![
                "was_price".to_string(),
                "list_price".to_string(),
                "regular_price".to_string(),
            ],
            savings_markers: vec!["save".to_string(), "off".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueFile {
    pub categories: Vec<CategorySpec>,
    #[serde(default)]
    pub pricing: PricingPolicy,
}

/// Load and validate the catalogue definition from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalogue(path: &Path) -> Result<CatalogueFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogueFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalogue(&content)
}

/// Parse and validate catalogue YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalogue(content: &str) -> Result<CatalogueFile, ConfigError> {
    let catalogue: CatalogueFile =
        serde_yaml::from_str(content).map_err(ConfigError::CatalogueFileParse)?;

    validate_catalogue(&catalogue)?;

    Ok(catalogue)
}

fn validate_catalogue(catalogue: &CatalogueFile) -> Result<(), ConfigError> {
    if catalogue.categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_ids = HashSet::new();

    for category in &catalogue.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }

        if category.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty id",
                category.name
            )));
        }

        if !seen_names.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }

        if !seen_ids.insert(category.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id: '{}' (from category '{}')",
                category.id, category.name
            )));
        }
    }

    let pricing = &catalogue.pricing;
    if pricing.price_field.trim().is_empty() || pricing.discount_text_field.trim().is_empty() {
        return Err(ConfigError::Validation(
            "pricing field names must be non-empty".to_string(),
        ));
    }
    if pricing.fallback_fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "pricing fallback field names must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalogue_test.rs"]
mod tests;
