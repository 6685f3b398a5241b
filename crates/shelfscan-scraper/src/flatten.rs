use serde_json::Value;
use shelfscan_core::{NormalizedRow, PricingPolicy};

use crate::error::ScraperError;
use crate::resolve::{PriceResolver, SiblingContext};
use crate::row::RowBuilder;
use crate::types::{FieldMap, RawEntry};

const ID_FIELD: &str = "id";
const APN_FIELD: &str = "apn";
const URL_FIELD: &str = "url";

const UNKNOWN_ID: &str = "N/A";
const UNKNOWN_NAME: &str = "Unknown Name";

/// Rows produced from one page of results, plus the number of entries that
/// could not be flattened.
#[derive(Debug, Default)]
pub struct PageRows {
    pub rows: Vec<NormalizedRow>,
    pub skipped: usize,
}

/// Turns browse results into [`NormalizedRow`]s: one row per variant, or one
/// row for an entry sold without variants.
#[derive(Debug, Clone)]
pub struct ItemFlattener<'a> {
    site_base_url: &'a str,
    resolver: PriceResolver<'a>,
}

impl<'a> ItemFlattener<'a> {
    #[must_use]
    pub fn new(site_base_url: &'a str, policy: &'a PricingPolicy) -> Self {
        Self {
            site_base_url: site_base_url.trim_end_matches('/'),
            resolver: PriceResolver::new(policy),
        }
    }

    /// Canonical product page for an entry.
    ///
    /// Falls back to `/product/{id}/` when the entry has no URL. Relative
    /// paths are joined to the site base; absolute URLs are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Normalization`] if `url` is present but not a
    /// string.
    pub fn product_url(&self, entry_id: &str, data: &FieldMap) -> Result<String, ScraperError> {
        let raw = match data.get(URL_FIELD) {
            None | Some(Value::Null) => format!("/product/{entry_id}/"),
            Some(Value::String(s)) if s.trim().is_empty() => format!("/product/{entry_id}/"),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => {
                return Err(ScraperError::Normalization {
                    entry_id: entry_id.to_string(),
                    reason: format!("url is not a string: {other}"),
                });
            }
        };

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(raw);
        }
        if raw.starts_with('/') {
            Ok(format!("{}{raw}", self.site_base_url))
        } else {
            Ok(format!("{}/{raw}", self.site_base_url))
        }
    }

    /// Flattens one entry. Either every row for the entry is returned or,
    /// on error, none are.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Normalization`] when the entry's structure
    /// cannot be interpreted.
    pub fn flatten(
        &self,
        entry: &RawEntry,
        category: &str,
    ) -> Result<Vec<NormalizedRow>, ScraperError> {
        let parent_id = entry
            .data
            .text(ID_FIELD)
            .unwrap_or_else(|| UNKNOWN_ID.to_string());
        let name = entry
            .value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_NAME);
        let url = self.product_url(&parent_id, &entry.data)?;

        let builder = RowBuilder::new(name, category, &url);
        let variants = entry.variants();

        if variants.is_empty() {
            let price = self.resolver.resolve(&entry.data, None);
            return Ok(vec![builder.item_row(parent_id, price)]);
        }

        let parent_price = self.resolver.current_price(&entry.data);
        let ceiling = variants
            .iter()
            .map(|v| self.resolver.current_price(&v.data))
            .fold(parent_price, f64::max);
        let siblings = SiblingContext {
            parent_was_price: self.resolver.was_price_from_text(&entry.data, parent_price),
            ceiling: Some(ceiling),
        };

        let builder = builder.suppress_variant_labels(variants.len() == 1);
        let rows = variants
            .iter()
            .map(|variant| {
                let id = variant
                    .data
                    .first_text(&[ID_FIELD, APN_FIELD])
                    .unwrap_or_else(|| format!("{parent_id}_var"));
                let price = self.resolver.resolve(&variant.data, Some(&siblings));
                builder.variant_row(id, &variant.data, price)
            })
            .collect();
        Ok(rows)
    }

    /// Flattens a page of raw results in order, skipping (and counting)
    /// entries that fail to decode or normalize.
    #[must_use]
    pub fn flatten_page(&self, results: Vec<Value>, category: &str) -> PageRows {
        let mut page = PageRows::default();
        for (index, raw) in results.into_iter().enumerate() {
            let outcome = serde_json::from_value::<RawEntry>(raw)
                .map_err(|source| ScraperError::Deserialize {
                    context: format!("browse result #{index}"),
                    source,
                })
                .and_then(|entry| self.flatten(&entry, category));
            match outcome {
                Ok(rows) => page.rows.extend(rows),
                Err(e) => {
                    tracing::warn!(category, index, error = %e, "skipping malformed entry");
                    page.skipped += 1;
                }
            }
        }
        page
    }
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod tests;
