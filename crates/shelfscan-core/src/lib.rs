//! Shared configuration, catalogue definitions, and the output dataset for
//! the shelfscan ingestion pipeline.

pub mod app_config;
pub mod catalogue;
pub mod config;
pub mod dataset;
pub mod rows;

use thiserror::Error;

pub use app_config::AppConfig;
pub use catalogue::{load_catalogue, parse_catalogue, CatalogueFile, CategorySpec, PricingPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use dataset::{format_price, write_catalogue, write_rows, DatasetError, HEADER};
pub use rows::NormalizedRow;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalogue file {path}: {source}")]
    CatalogueFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue file: {0}")]
    CatalogueFileParse(#[source] serde_yaml::Error),

    #[error("catalogue validation failed: {0}")]
    Validation(String),
}
