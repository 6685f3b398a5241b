use std::path::PathBuf;

/// Runtime settings for one ingestion run, read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Browse API key sent as the `key` query parameter.
    pub api_key: String,
    /// Client identifier sent as the `c` query parameter.
    pub client_id: String,
    pub api_base_url: String,
    /// Storefront origin that relative product URLs are joined onto.
    pub site_base_url: String,
    pub catalogue_path: PathBuf,
    pub output_path: PathBuf,
    pub log_level: String,
    pub page_size: u32,
    /// Page cap per category; a category still returning results at the cap
    /// is reported as truncated.
    pub max_pages: u32,
    pub inter_page_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub sort_by: String,
    pub sort_order: String,
    pub max_concurrent_categories: usize,
}

impl AppConfig {
    /// `Referer` header value for browse requests: the storefront root.
    #[must_use]
    pub fn referer(&self) -> String {
        format!("{}/", self.site_base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("client_id", &self.client_id)
            .field("api_base_url", &self.api_base_url)
            .field("site_base_url", &self.site_base_url)
            .field("catalogue_path", &self.catalogue_path)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("sort_by", &self.sort_by)
            .field("sort_order", &self.sort_order)
            .field("max_concurrent_categories", &self.max_concurrent_categories)
            .finish()
    }
}
