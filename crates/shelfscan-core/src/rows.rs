/// One flattened catalogue row: a single purchasable item or variant with a
/// reconciled price pair.
///
/// Rows are built once by the scraper's row builder and never mutated.
/// `original_price >= current_price` always holds for rows produced there.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// Variant id when the row came from a variant, otherwise the parent id.
    pub id: String,
    pub product_name: String,
    /// `"Size 10 / Navy"` style label; empty for single items and
    /// single-variant products.
    pub variant_label: String,
    pub original_price: f64,
    pub current_price: f64,
    /// Display text such as `"20.0%"` or `"0%"`, derived from the prices.
    pub discount_percent: String,
    pub category: String,
    /// Product page URL, with variant selection query parameters if any.
    pub link: String,
}
