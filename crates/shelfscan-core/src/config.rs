use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let non_zero = |var: &str, value: u64| -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    };

    let api_key = require("SHELFSCAN_API_KEY")?;
    let client_id = or_default("SHELFSCAN_CLIENT_ID", "ciojs-client-2.71.1");
    let api_base_url = or_default("SHELFSCAN_API_BASE_URL", "https://ac.cnstrc.com");
    let site_base_url = or_default("SHELFSCAN_SITE_BASE_URL", "https://www.kmart.co.nz");
    let catalogue_path = PathBuf::from(or_default(
        "SHELFSCAN_CATALOGUE_PATH",
        "./config/catalogue.yaml",
    ));
    let output_path = PathBuf::from(or_default(
        "SHELFSCAN_OUTPUT_PATH",
        "kmart_full_catalogue.csv",
    ));
    let log_level = or_default("SHELFSCAN_LOG_LEVEL", "info");

    let page_size = parse_u32("SHELFSCAN_PAGE_SIZE", "200")?;
    non_zero("SHELFSCAN_PAGE_SIZE", u64::from(page_size))?;
    let max_pages = parse_u32("SHELFSCAN_MAX_PAGES", "500")?;
    non_zero("SHELFSCAN_MAX_PAGES", u64::from(max_pages))?;
    let inter_page_delay_ms = parse_u64("SHELFSCAN_INTER_PAGE_DELAY_MS", "500")?;
    let request_timeout_secs = parse_u64("SHELFSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    non_zero("SHELFSCAN_REQUEST_TIMEOUT_SECS", request_timeout_secs)?;
    let user_agent = or_default("SHELFSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let sort_by = or_default("SHELFSCAN_SORT_BY", "relevance");
    let sort_order = or_default("SHELFSCAN_SORT_ORDER", "descending");
    let max_concurrent_categories = parse_usize("SHELFSCAN_MAX_CONCURRENT_CATEGORIES", "1")?;
    non_zero(
        "SHELFSCAN_MAX_CONCURRENT_CATEGORIES",
        u64::try_from(max_concurrent_categories).unwrap_or(u64::MAX),
    )?;

    Ok(AppConfig {
        api_key,
        client_id,
        api_base_url,
        site_base_url,
        catalogue_path,
        output_path,
        log_level,
        page_size,
        max_pages,
        inter_page_delay_ms,
        request_timeout_secs,
        user_agent,
        sort_by,
        sort_order,
        max_concurrent_categories,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
