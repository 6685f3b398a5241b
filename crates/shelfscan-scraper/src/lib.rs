pub mod client;
pub mod error;
pub mod flatten;
pub mod pacing;
pub mod pagination;
pub mod price;
pub mod resolve;
pub mod row;
pub mod types;

pub use client::{CatalogueClient, CategoryCrawl, CrawlOptions, CrawlReport};
pub use error::ScraperError;
pub use flatten::{ItemFlattener, PageRows};
pub use pagination::{CrawlTermination, MAX_PAGES};
pub use price::extract_price;
pub use resolve::{OriginalPriceSource, PriceResolver, ResolvedPrice, SiblingContext};
pub use row::RowBuilder;
pub use types::{FieldMap, RawEntry, RawVariant};
