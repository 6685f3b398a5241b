//! Original/current price reconciliation.
//!
//! Upstream entries rarely carry a clean "was" price. The resolver walks a
//! fixed chain of candidate signals and takes the first one that beats the
//! current price:
//!
//! 1. the item's own discount text,
//! 2. the parent entry's "was" price (variants only),
//! 3. the largest configured fallback field,
//! 4. the highest price among sibling variants (variants only).
//!
//! Whatever wins, `original >= current` holds on the way out.

use shelfscan_core::PricingPolicy;

use crate::price::{extract_percent, extract_price};
use crate::types::FieldMap;

/// Which signal supplied the original price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginalPriceSource {
    OwnDiscountText,
    ParentWasPrice,
    FallbackField,
    SiblingCeiling,
    NoDiscount,
}

/// Context shared by every variant of one parent entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SiblingContext {
    /// "Was" price derived from the parent's own discount text.
    pub parent_was_price: Option<f64>,
    /// Maximum of the parent price and every variant price.
    pub ceiling: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    pub original: f64,
    pub current: f64,
    /// Display text, e.g. `"20.0%"` or `"0%"`.
    pub discount_percent: String,
    pub source: OriginalPriceSource,
}

impl ResolvedPrice {
    fn settle(original: f64, current: f64, source: OriginalPriceSource) -> Self {
        let (original, source) = if original < current {
            (current, OriginalPriceSource::NoDiscount)
        } else {
            (original, source)
        };
        Self {
            original,
            current,
            discount_percent: discount_percent_text(original, current),
            source,
        }
    }
}

/// Formats the markdown as a percentage of the original price, rounded to one
/// decimal place, or `"0%"` when there is none.
#[must_use]
pub fn discount_percent_text(original: f64, current: f64) -> String {
    if original > 0.0 && current < original {
        let pct = (original - current) / original * 100.0;
        format!("{pct:.1}%")
    } else {
        "0%".to_string()
    }
}

/// Applies a [`PricingPolicy`] to upstream field sets.
#[derive(Debug, Clone, Copy)]
pub struct PriceResolver<'a> {
    policy: &'a PricingPolicy,
}

impl<'a> PriceResolver<'a> {
    #[must_use]
    pub fn new(policy: &'a PricingPolicy) -> Self {
        Self { policy }
    }

    /// Current selling price; `0.0` when the field is missing or unparsable.
    #[must_use]
    pub fn current_price(&self, fields: &FieldMap) -> f64 {
        fields.price(&self.policy.price_field)
    }

    /// "Was" price implied by the discount text field of `fields`.
    ///
    /// A percentage (`"20% off"`) is read as a markdown of `reference` and
    /// only counts for `0 < p < 100`. Text phrased as a saving (`"Save $5"`)
    /// is added to `reference`; any other text (`"Was $25"`) is taken as the
    /// former price itself.
    #[must_use]
    pub fn was_price_from_text(&self, fields: &FieldMap, reference: f64) -> Option<f64> {
        let text = fields.text(&self.policy.discount_text_field)?;
        if let Some(pct) = extract_percent(Some(&text)) {
            if pct >= 100.0 || reference <= 0.0 {
                return None;
            }
            return Some(round_cents(reference / (1.0 - pct / 100.0)));
        }
        let amount = extract_price(Some(&text))?;
        if self.is_savings_text(&text) {
            Some(reference + amount)
        } else {
            Some(amount)
        }
    }

    /// Largest configured fallback field value; `0.0` when none parse.
    #[must_use]
    pub fn fallback_price(&self, fields: &FieldMap) -> f64 {
        self.policy
            .fallback_fields
            .iter()
            .map(|field| fields.price(field))
            .fold(0.0, f64::max)
    }

    /// Resolves the price pair for one item or variant.
    ///
    /// `siblings` is `None` for entries sold without variants, which limits
    /// the chain to the item's own discount text and its fallback fields.
    #[must_use]
    pub fn resolve(&self, fields: &FieldMap, siblings: Option<&SiblingContext>) -> ResolvedPrice {
        let current = self.current_price(fields);

        if let Some(own) = self
            .was_price_from_text(fields, current)
            .filter(|v| *v > current)
        {
            return ResolvedPrice::settle(own, current, OriginalPriceSource::OwnDiscountText);
        }

        if let Some(parent) = siblings
            .and_then(|s| s.parent_was_price)
            .filter(|v| *v > current)
        {
            return ResolvedPrice::settle(parent, current, OriginalPriceSource::ParentWasPrice);
        }

        let fallback = self.fallback_price(fields);
        if fallback > current {
            return ResolvedPrice::settle(fallback, current, OriginalPriceSource::FallbackField);
        }

        if let Some(ceiling) = siblings.and_then(|s| s.ceiling).filter(|v| *v > current) {
            return ResolvedPrice::settle(ceiling, current, OriginalPriceSource::SiblingCeiling);
        }

        ResolvedPrice::settle(current, current, OriginalPriceSource::NoDiscount)
    }

    fn is_savings_text(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                self.policy
                    .savings_markers
                    .iter()
                    .any(|marker| marker.eq_ignore_ascii_case(word))
            })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
