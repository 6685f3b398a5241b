//! `crawl` and `categories` command handlers.
//!
//! A failed category is logged and reported, not propagated. Rows collected
//! before an abort are always written; the command fails afterwards when
//! every selected category aborted, or when the dataset cannot be written.

use std::path::Path;

use reqwest::Url;
use shelfscan_core::{AppConfig, CatalogueFile, CategorySpec};
use shelfscan_scraper::{CatalogueClient, CrawlOptions, ItemFlattener};

/// Categories to crawl: all of them, or the one matching `filter` by name or id.
pub(crate) fn select_categories(
    categories: &[CategorySpec],
    filter: Option<&str>,
) -> anyhow::Result<Vec<CategorySpec>> {
    let Some(filter) = filter else {
        return Ok(categories.to_vec());
    };
    let selected: Vec<CategorySpec> = categories
        .iter()
        .filter(|c| c.matches(filter))
        .cloned()
        .collect();
    if selected.is_empty() {
        anyhow::bail!("category '{filter}' not found in catalogue config");
    }
    Ok(selected)
}

/// Replaces the `key` query parameter so URLs can be printed.
pub(crate) fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "REDACTED".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

/// Crawls the selected categories and writes the dataset.
///
/// When `dry_run` is `true` the first-page request for each category is
/// printed and nothing is fetched or written.
///
/// # Errors
///
/// Returns an error if the category filter matches nothing, the client
/// cannot be built, or the dataset cannot be written. Also returns an error
/// when every category aborted, after writing any rows they produced.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    catalogue: &CatalogueFile,
    category_filter: Option<&str>,
    output: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let categories = select_categories(&catalogue.categories, category_filter)?;
    let client = CatalogueClient::from_config(config)?;
    let options = CrawlOptions::from_config(config);

    if dry_run {
        let now_ms = chrono::Utc::now().timestamp_millis();
        println!("dry-run: would crawl {} categories", categories.len());
        for c in &categories {
            let url = client.browse_url(&c.id, 1, options.page_size, now_ms)?;
            println!("  {} -> {}", c.label(), redact_api_key(&url));
        }
        return Ok(());
    }

    let flattener = ItemFlattener::new(&config.site_base_url, &catalogue.pricing);
    let report = client
        .crawl_catalogue(&categories, &flattener, &options)
        .await;

    for c in &report.categories {
        println!(
            "{}: {} rows from {} pages, {} skipped ({})",
            c.category,
            c.rows.len(),
            c.pages_fetched,
            c.skipped_items,
            c.termination
        );
    }

    let category_count = report.categories.len();
    let all_aborted = report.all_aborted();
    let truncated = report.truncated_count();
    let rows = report.into_rows();
    let path = output.unwrap_or(&config.output_path);

    if truncated > 0 {
        tracing::warn!(
            truncated,
            max_pages = options.max_pages,
            "categories truncated at the page limit"
        );
        println!(
            "{truncated} of {category_count} categories truncated at the {}-page limit",
            options.max_pages
        );
    }

    if rows.is_empty() {
        if all_aborted {
            anyhow::bail!("all {category_count} categories failed to crawl");
        }
        tracing::warn!(path = %path.display(), "no rows collected; dataset not written");
        println!("no rows collected; {} left untouched", path.display());
        return Ok(());
    }

    let written = shelfscan_core::write_catalogue(path, &rows)?;
    tracing::info!(rows = written, path = %path.display(), "catalogue written");
    println!(
        "wrote {written} rows across {category_count} categories to {}",
        path.display()
    );

    if all_aborted {
        anyhow::bail!(
            "all {category_count} categories aborted after writing {written} rows"
        );
    }

    Ok(())
}

pub(crate) fn run_categories(catalogue: &CatalogueFile) {
    for c in &catalogue.categories {
        println!("{}\t{}\t{}", c.name, c.id, c.label());
    }
}
