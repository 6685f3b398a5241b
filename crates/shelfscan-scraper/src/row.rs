use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use shelfscan_core::NormalizedRow;

use crate::resolve::ResolvedPrice;
use crate::types::FieldMap;

pub(crate) const SIZE_FIELD: &str = "Size";
pub(crate) const SECONDARY_COLOUR_FIELD: &str = "SecondaryColour";
pub(crate) const COLOUR_FIELD: &str = "Colour";

/// Colour fields in preference order.
const COLOUR_FIELDS: [&str; 2] = [SECONDARY_COLOUR_FIELD, COLOUR_FIELD];

const ONE_SIZE: &str = "one size";
const LABEL_SEPARATOR: &str = " / ";

/// Everything except ASCII alphanumerics and `-_.~` is escaped; spaces become
/// `+` afterwards, matching HTML form encoding.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Form-encodes one query parameter value (`"Light Blue"` → `"Light+Blue"`).
#[must_use]
pub fn quote_plus(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE)
        .to_string()
        .replace("%20", "+")
}

/// Builds [`NormalizedRow`]s for one parent entry.
#[derive(Debug, Clone)]
pub struct RowBuilder<'a> {
    product_name: &'a str,
    category: &'a str,
    product_url: &'a str,
    suppress_labels: bool,
}

impl<'a> RowBuilder<'a> {
    #[must_use]
    pub fn new(product_name: &'a str, category: &'a str, product_url: &'a str) -> Self {
        Self {
            product_name,
            category,
            product_url,
            suppress_labels: false,
        }
    }

    /// A product with exactly one variant is presented as a plain item.
    #[must_use]
    pub fn suppress_variant_labels(mut self, suppress: bool) -> Self {
        self.suppress_labels = suppress;
        self
    }

    /// Row for an entry sold without variants: empty label, bare product URL.
    #[must_use]
    pub fn item_row(&self, id: String, price: ResolvedPrice) -> NormalizedRow {
        self.build(id, String::new(), self.product_url.to_string(), price)
    }

    /// Row for one variant, labelled and deep-linked from its own fields.
    #[must_use]
    pub fn variant_row(
        &self,
        id: String,
        fields: &FieldMap,
        price: ResolvedPrice,
    ) -> NormalizedRow {
        let label = if self.suppress_labels {
            String::new()
        } else {
            variant_label(fields)
        };
        let link = deep_link(self.product_url, fields);
        self.build(id, label, link, price)
    }

    fn build(
        &self,
        id: String,
        variant_label: String,
        link: String,
        price: ResolvedPrice,
    ) -> NormalizedRow {
        NormalizedRow {
            id,
            product_name: self.product_name.to_string(),
            variant_label,
            original_price: price.original,
            current_price: price.current,
            discount_percent: price.discount_percent,
            category: self.category.to_string(),
            link,
        }
    }
}

fn size(fields: &FieldMap) -> Option<String> {
    fields.text(SIZE_FIELD)
}

fn colour(fields: &FieldMap) -> Option<String> {
    fields.first_text(&COLOUR_FIELDS)
}

/// `"Size 10 / Navy"`. A size of "One Size" (any case) is left out.
#[must_use]
pub fn variant_label(fields: &FieldMap) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(size) = size(fields).filter(|s| !s.eq_ignore_ascii_case(ONE_SIZE)) {
        parts.push(format!("Size {size}"));
    }
    if let Some(colour) = colour(fields) {
        parts.push(colour);
    }
    parts.join(LABEL_SEPARATOR)
}

/// Product URL with `selectedSwatch` and `size` query parameters for the
/// variant's colour and size, in that order. No query string when neither
/// is present.
#[must_use]
pub fn deep_link(product_url: &str, fields: &FieldMap) -> String {
    let mut params = Vec::with_capacity(2);
    if let Some(colour) = colour(fields) {
        params.push(format!("selectedSwatch={}", quote_plus(&colour)));
    }
    if let Some(size) = size(fields) {
        params.push(format!("size={}", quote_plus(&size)));
    }
    if params.is_empty() {
        product_url.to_string()
    } else {
        format!("{product_url}?{}", params.join("&"))
    }
}
