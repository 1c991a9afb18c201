//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target a locally running API.
//!
//! - `BAZAAR_API_BASE_URL` - Base URL of the remote API (default: `http://localhost:9090/api/`)
//! - `BAZAAR_SESSION_FILE` - Path of the session key-value file (default: `bazaar_session.json`)
//! - `BAZAAR_PRODUCTS_PER_PAGE` - Page size for the flat product list (default: 18)
//! - `BAZAAR_CATEGORY_PAGE_SIZE` - Page size for per-category product lists (default: 12)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:9090/api/";
const DEFAULT_SESSION_FILE: &str = "bazaar_session.json";
const DEFAULT_PRODUCTS_PER_PAGE: u32 = 18;
const DEFAULT_CATEGORY_PAGE_SIZE: u32 = 12;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote catalog/auth API.
    pub api_base_url: Url,
    /// Path of the persistent session key-value file.
    pub session_file: PathBuf,
    /// Page size requested by the flat product list.
    pub products_per_page: u32,
    /// Page size requested by per-category product lists.
    pub category_page_size: u32,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("BAZAAR_API_BASE_URL", DEFAULT_API_BASE_URL);
        // A trailing slash matters: relative endpoint paths are joined onto it.
        let api_base_url = normalize_base_url(&api_base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_API_BASE_URL".to_owned(), e))?;

        let session_file =
            PathBuf::from(get_env_or_default("BAZAAR_SESSION_FILE", DEFAULT_SESSION_FILE));

        let products_per_page =
            parse_env_or("BAZAAR_PRODUCTS_PER_PAGE", DEFAULT_PRODUCTS_PER_PAGE)?;
        let category_page_size =
            parse_env_or("BAZAAR_CATEGORY_PAGE_SIZE", DEFAULT_CATEGORY_PAGE_SIZE)?;
        let timeout_secs = parse_env_or(
            "BAZAAR_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_base_url,
            session_file,
            products_per_page,
            category_page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: normalize_base_url(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            products_per_page: DEFAULT_PRODUCTS_PER_PAGE,
            category_page_size: DEFAULT_CATEGORY_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Parse a base URL, forcing a trailing slash so `Url::join` appends
/// endpoint paths instead of replacing the last segment.
fn normalize_base_url(raw: &str) -> Result<Url, String> {
    let with_slash = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| e.to_string())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}
