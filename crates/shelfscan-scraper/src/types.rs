//! Browse API response types.
//!
//! ## Observed shape
//!
//! ```text
//! { "response": { "results": [
//!     { "data": { "id": "43012345", "url": "/product/...", "price": 20, "SavePrice": "Save $5", ... },
//!       "value": "Cotton Crew Tee",
//!       "variations": [ { "data": { "id": "...", "price": "20.00", "Size": "10", "Colour": "Navy" } } ] }
//! ] } }
//! ```
//!
//! ### `data`
//! Retailer-specific and inconsistently populated. Prices arrive as JSON
//! numbers on some entries and as numeric strings on others; discount text
//! (`SavePrice`) is free-form marketing copy. The map is kept loosely typed
//! behind [`FieldMap`], whose accessors state their defaults explicitly.
//!
//! ### `results`
//! Kept as raw JSON values at the page level so a single malformed entry can
//! be skipped without failing the page. An empty list marks the last page.
//!
//! ### `variations`
//! Absent, `null`, or `[]` on items sold without size/colour options.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::price::parse_number_value;

/// Top-level envelope from `GET /browse/group_id/{id}`.
#[derive(Debug, Deserialize)]
pub struct BrowseResponse {
    pub response: BrowseBody,
}

#[derive(Debug, Deserialize)]
pub struct BrowseBody {
    pub results: Vec<Value>,
}

/// One browse result: a parent product with zero or more variants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub data: FieldMap,

    /// Display name of the product.
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub variations: Option<Vec<RawVariant>>,
}

impl RawEntry {
    /// Variants in upstream order; empty when the field is absent or `null`.
    #[must_use]
    pub fn variants(&self) -> &[RawVariant] {
        self.variations.as_deref().unwrap_or_default()
    }
}

/// One size/colour combination beneath a [`RawEntry`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    #[serde(default)]
    pub data: FieldMap,
}

/// Loosely-typed upstream field set with explicit, defaulted accessors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(Map<String, Value>);

impl FieldMap {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric value of `key`, accepting JSON numbers and numeric strings.
    /// `None` when absent, non-numeric, or not finite.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(parse_number_value)
    }

    /// Price stored under `key`; `0.0` when absent, unparsable, or negative.
    #[must_use]
    pub fn price(&self, key: &str) -> f64 {
        self.number(key).filter(|v| *v >= 0.0).unwrap_or(0.0)
    }

    /// Non-empty text stored under `key`. Numbers are rendered as their JSON
    /// text; `null`, booleans, arrays and objects are treated as absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First non-empty text among `keys`, in order.
    #[must_use]
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }
}

impl From<Map<String, Value>> for FieldMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> FieldMap {
        serde_json::from_value(value).expect("valid field map")
    }

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        let f = fields(json!({"a": 12.5, "b": "20.00", "c": " 7 "}));
        assert_eq!(f.price("a"), 12.5);
        assert_eq!(f.price("b"), 20.0);
        assert_eq!(f.price("c"), 7.0);
    }

    #[test]
    fn price_defaults_to_zero() {
        let f = fields(json!({"bad": "N/A", "null": null, "obj": {"x": 1}, "neg": -4}));
        assert_eq!(f.price("missing"), 0.0);
        assert_eq!(f.price("bad"), 0.0);
        assert_eq!(f.price("null"), 0.0);
        assert_eq!(f.price("obj"), 0.0);
        assert_eq!(f.price("neg"), 0.0);
    }

    #[test]
    fn text_skips_empty_and_non_scalar_values() {
        let f = fields(json!({"s": "Navy", "e": "", "n": 10, "b": true, "z": null}));
        assert_eq!(f.text("s").as_deref(), Some("Navy"));
        assert_eq!(f.text("n").as_deref(), Some("10"));
        assert!(f.text("e").is_none());
        assert!(f.text("b").is_none());
        assert!(f.text("z").is_none());
        assert!(f.text("missing").is_none());
    }

    #[test]
    fn first_text_respects_key_order() {
        let f = fields(json!({"Colour": "Navy", "SecondaryColour": "Light Blue"}));
        assert_eq!(
            f.first_text(&["SecondaryColour", "Colour"]).as_deref(),
            Some("Light Blue")
        );
        let f = fields(json!({"Colour": "Navy", "SecondaryColour": ""}));
        assert_eq!(
            f.first_text(&["SecondaryColour", "Colour"]).as_deref(),
            Some("Navy")
        );
    }

    #[test]
    fn entry_without_variations_has_no_variants() {
        let entry: RawEntry =
            serde_json::from_value(json!({"data": {"id": "1"}, "value": "Mug"})).unwrap();
        assert!(entry.variants().is_empty());

        let entry: RawEntry =
            serde_json::from_value(json!({"data": {}, "variations": null})).unwrap();
        assert!(entry.variants().is_empty());
    }

    #[test]
    fn entry_with_non_object_data_is_rejected() {
        let result = serde_json::from_value::<RawEntry>(json!({"data": "oops"}));
        assert!(result.is_err());
    }

    #[test]
    fn browse_response_requires_results() {
        let result = serde_json::from_value::<BrowseResponse>(json!({"response": {}}));
        assert!(result.is_err());
        let ok = serde_json::from_value::<BrowseResponse>(json!({"response": {"results": []}}))
            .unwrap();
        assert!(ok.response.results.is_empty());
    }
}
