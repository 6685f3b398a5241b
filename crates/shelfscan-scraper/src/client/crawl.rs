//! Category crawl loops for `CatalogueClient`.

use futures::stream::{self, StreamExt};
use shelfscan_core::{AppConfig, CategorySpec, NormalizedRow};

use crate::flatten::ItemFlattener;
use crate::pacing::InterPageDelay;
use crate::pagination::{CrawlTermination, PageCursor, MAX_PAGES};

use super::CatalogueClient;

/// Paging and pacing knobs for a crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub page_size: u32,
    /// Delay before every page request except a category's first.
    pub inter_page_delay_ms: u64,
    /// Categories crawled at once. `1` keeps the crawl strictly sequential.
    pub max_concurrent_categories: usize,
    pub max_pages: u32,
}

impl CrawlOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            inter_page_delay_ms: config.inter_page_delay_ms,
            max_concurrent_categories: config.max_concurrent_categories,
            max_pages: config.max_pages,
        }
    }
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            page_size: 200,
            inter_page_delay_ms: 500,
            max_concurrent_categories: 1,
            max_pages: MAX_PAGES,
        }
    }
}

/// Outcome of crawling one category.
#[derive(Debug)]
pub struct CategoryCrawl {
    /// Category label written into each row.
    pub category: String,
    pub category_id: String,
    pub rows: Vec<NormalizedRow>,
    /// Non-empty pages processed.
    pub pages_fetched: u32,
    /// Entries dropped because they could not be flattened.
    pub skipped_items: usize,
    pub termination: CrawlTermination,
}

/// Per-category outcomes, in configured category order.
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub categories: Vec<CategoryCrawl>,
}

impl CrawlReport {
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.categories.iter().map(|c| c.rows.len()).sum()
    }

    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.categories.iter().map(|c| c.skipped_items).sum()
    }

    #[must_use]
    pub fn aborted_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.termination.is_aborted())
            .count()
    }

    /// Categories cut off at the page cap with results still coming.
    #[must_use]
    pub fn truncated_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.termination.is_truncated())
            .count()
    }

    /// `true` when at least one category was crawled and every one aborted.
    #[must_use]
    pub fn all_aborted(&self) -> bool {
        !self.categories.is_empty() && self.aborted_count() == self.categories.len()
    }

    /// Every row, category by category, in emission order.
    #[must_use]
    pub fn into_rows(self) -> Vec<NormalizedRow> {
        self.categories
            .into_iter()
            .flat_map(|c| c.rows)
            .collect()
    }
}

impl CatalogueClient {
    /// Crawls one category page by page until an empty page, a failed page,
    /// or the page cap.
    ///
    /// Never fails: a failed page ends the category with
    /// [`CrawlTermination::Aborted`] and keeps rows from earlier pages.
    pub async fn crawl_category(
        &self,
        spec: &CategorySpec,
        flattener: &ItemFlattener<'_>,
        options: &CrawlOptions,
    ) -> CategoryCrawl {
        let label = spec.label();
        let mut crawl = CategoryCrawl {
            category: label.clone(),
            category_id: spec.id.clone(),
            rows: Vec::new(),
            pages_fetched: 0,
            skipped_items: 0,
            termination: CrawlTermination::PageLimit {
                max_pages: options.max_pages,
            },
        };

        tracing::info!(category = %label, id = %spec.id, "crawling category");

        let mut cursor = PageCursor::new(options.max_pages);
        let mut pacing = InterPageDelay::from_millis(options.inter_page_delay_ms);

        while let Some(page) = cursor.next_page() {
            pacing.wait().await;

            let results = match self
                .fetch_browse_page(&spec.id, page, options.page_size)
                .await
            {
                Ok(results) => results,
                Err(e) => {
                    tracing::error!(
                        category = %label,
                        page,
                        error = %e,
                        "page request failed; abandoning category"
                    );
                    crawl.termination = CrawlTermination::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                    return crawl;
                }
            };

            if results.is_empty() {
                tracing::debug!(category = %label, page, "empty page; category exhausted");
                crawl.termination = CrawlTermination::Exhausted;
                return crawl;
            }

            let items = results.len();
            let page_rows = flattener.flatten_page(results, &label);
            tracing::info!(
                category = %label,
                page,
                items,
                rows = page_rows.rows.len(),
                skipped = page_rows.skipped,
                "processed page"
            );

            crawl.pages_fetched += 1;
            crawl.skipped_items += page_rows.skipped;
            crawl.rows.extend(page_rows.rows);
        }

        tracing::warn!(
            category = %label,
            max_pages = options.max_pages,
            "page limit reached before an empty page"
        );
        crawl
    }

    /// Crawls every category and collects the outcomes in the given order.
    ///
    /// With `max_concurrent_categories > 1` several categories are in flight
    /// at once; each keeps its own row buffer and the report is still
    /// assembled in configured order.
    pub async fn crawl_catalogue(
        &self,
        categories: &[CategorySpec],
        flattener: &ItemFlattener<'_>,
        options: &CrawlOptions,
    ) -> CrawlReport {
        let concurrency = options.max_concurrent_categories.max(1);

        let categories: Vec<CategoryCrawl> = stream::iter(categories)
            .map(|spec| self.crawl_category(spec, flattener, options))
            .buffered(concurrency)
            .collect()
            .await;

        let report = CrawlReport { categories };
        tracing::info!(
            categories = report.categories.len(),
            rows = report.total_rows(),
            skipped = report.total_skipped(),
            aborted = report.aborted_count(),
            truncated = report.truncated_count(),
            "crawl complete"
        );
        report
    }
}
