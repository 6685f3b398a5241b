//! HTTP client for the category browse endpoint.

mod crawl;

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;
use shelfscan_core::AppConfig;

use crate::error::ScraperError;
use crate::types::BrowseResponse;

pub use crawl::{CategoryCrawl, CrawlOptions, CrawlReport};

pub const DEFAULT_CLIENT_ID: &str = "ciojs-client-2.71.1";

/// HTTP client for `GET {base}/browse/group_id/{category_id}`.
///
/// One request per call; nothing is retried. 429, 404 and other non-2xx
/// responses map to typed errors, and so does a body that does not have the
/// browse response shape. Error URLs never include the query string, which
/// carries the API key.
pub struct CatalogueClient {
    client: Client,
    api_key: String,
    client_id: String,
    base_url: Url,
    referer: Option<String>,
    sort_by: String,
    sort_order: String,
}

impl CatalogueClient {
    /// Creates a client against `base_url` with the given request timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`ScraperError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            base_url,
            referer: None,
            sort_by: "relevance".to_string(),
            sort_order: "descending".to_string(),
        })
    }

    /// Builds a client from the environment-derived [`AppConfig`].
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(
            &config.api_key,
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_client_id(&config.client_id)
        .with_referer(&config.referer())
        .with_sort(&config.sort_by, &config.sort_order))
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = client_id.to_string();
        self
    }

    #[must_use]
    pub fn with_referer(mut self, referer: &str) -> Self {
        self.referer = Some(referer.to_string());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: &str, sort_order: &str) -> Self {
        self.sort_by = sort_by.to_string();
        self.sort_order = sort_order.to_string();
        self
    }

    /// Builds the request URL for one page of a category.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the base URL cannot carry
    /// path segments.
    pub fn browse_url(
        &self,
        category_id: &str,
        page: u32,
        page_size: u32,
        timestamp_ms: i64,
    ) -> Result<Url, ScraperError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ScraperError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["browse", "group_id", category_id]);

        url.query_pairs_mut()
            .append_pair("c", &self.client_id)
            .append_pair("key", &self.api_key)
            .append_pair("page", &page.to_string())
            .append_pair("num_results_per_page", &page_size.to_string())
            .append_pair("sort_by", &self.sort_by)
            .append_pair("sort_order", &self.sort_order)
            .append_pair("_dt", &timestamp_ms.to_string());

        Ok(url)
    }

    /// Fetches one page of a category and returns its raw `results` list.
    /// An empty list means the category has no further pages.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429.
    /// - [`ScraperError::NotFound`]: HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network, TLS, or timeout failure.
    /// - [`ScraperError::Deserialize`]: body is not a browse response.
    pub async fn fetch_browse_page(
        &self,
        category_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Value>, ScraperError> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let url = self.browse_url(category_id, page, page_size, timestamp_ms)?;
        let display_url = without_query(&url);

        let mut request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(referer) = &self.referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScraperError::Http(e.without_url()))?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: url.host_str().unwrap_or_default().to_string(),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound { url: display_url });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: display_url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::Http(e.without_url()))?;
        let parsed = serde_json::from_str::<BrowseResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("browse page {page} of category {category_id}"),
                source: e,
            }
        })?;

        Ok(parsed.response.results)
    }
}

fn without_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
