//! Pipe-delimited catalogue dataset consumed by the site generator.
//!
//! The column order and header text are a downstream contract; the generator
//! looks columns up by these exact names.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::rows::NormalizedRow;

/// Column header, in output order.
pub const HEADER: [&str; 8] = [
    "id",
    "product name",
    "variant label",
    "Original price",
    "discounted price",
    "disc%",
    "category",
    "product link",
];

const DELIMITER: u8 = b'|';

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to write catalogue to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode catalogue row: {0}")]
    Csv(#[from] csv::Error),
}

/// Renders a price as plain decimal text with at least one fractional digit,
/// e.g. `25.0`, `12.5`, `0.99`.
#[must_use]
pub fn format_price(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// Writes the header and every row, in the given order, to `writer`.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if a record cannot be encoded or the
/// underlying writer fails.
pub fn write_rows<W: io::Write>(writer: W, rows: &[NormalizedRow]) -> Result<usize, DatasetError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record([
            row.id.as_str(),
            row.product_name.as_str(),
            row.variant_label.as_str(),
            format_price(row.original_price).as_str(),
            format_price(row.current_price).as_str(),
            row.discount_percent.as_str(),
            row.category.as_str(),
            row.link.as_str(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;

    Ok(rows.len())
}

/// Writes the full catalogue to `path` in one pass, replacing any existing file.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be created, or
/// [`DatasetError::Csv`] if writing a record fails.
pub fn write_catalogue(path: &Path, rows: &[NormalizedRow]) -> Result<usize, DatasetError> {
    let file = std::fs::File::create(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_rows(io::BufWriter::new(file), rows)
}
