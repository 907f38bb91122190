//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RIGSHOP_API_URL` - Base URL of the REST API (e.g., `https://shop.example.com/api`)
//!
//! ## Optional
//! - `RIGSHOP_ASSET_URL` - Base URL for relative image paths (default: origin of the API URL)
//! - `RIGSHOP_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
//! - `RIGSHOP_TOKEN_FILE` - Session file (default: `$HOME/.config/rigshop/session.json`)
//! - `RIGSHOP_TOKEN` - Bearer token; takes precedence over the session file
//! - `RIGSHOP_CURRENCY` - ISO 4217 code used to display prices (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use rigshop_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "15";
const DEFAULT_TOKEN_FILE: &str = ".config/rigshop/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// REST API base URL
    pub api_url: Url,
    /// Base URL that relative image paths are resolved against
    pub asset_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Where the session token is persisted between runs
    pub token_file: PathBuf,
    /// Token supplied through the environment, if any
    pub token: Option<SecretString>,
    /// Currency prices are displayed in
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_url", &self.api_url.as_str())
            .field("asset_url", &self.asset_url.as_str())
            .field("timeout", &self.timeout)
            .field("token_file", &self.token_file)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("currency", &self.currency)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_url("RIGSHOP_API_URL", &get_required_env(&lookup, "RIGSHOP_API_URL")?)?;

        let asset_url = match get_optional_env(&lookup, "RIGSHOP_ASSET_URL") {
            Some(raw) => parse_url("RIGSHOP_ASSET_URL", &raw)?,
            None => origin_of(&api_url),
        };

        let timeout_secs = get_env_or_default(&lookup, "RIGSHOP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("RIGSHOP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RIGSHOP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let token_file = match get_optional_env(&lookup, "RIGSHOP_TOKEN_FILE") {
            Some(path) => PathBuf::from(path),
            None => {
                let home = get_required_env(&lookup, "HOME").map_err(|_| {
                    ConfigError::MissingEnvVar("RIGSHOP_TOKEN_FILE (or HOME)".to_string())
                })?;
                PathBuf::from(home).join(DEFAULT_TOKEN_FILE)
            }
        };

        let currency = match get_optional_env(&lookup, "RIGSHOP_CURRENCY") {
            Some(code) => code.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("RIGSHOP_CURRENCY".to_string(), e.to_string())
            })?,
            None => CurrencyCode::default(),
        };

        Ok(Self {
            api_url,
            asset_url,
            timeout: Duration::from_secs(timeout_secs),
            token_file,
            token: get_optional_env(&lookup, "RIGSHOP_TOKEN").map(SecretString::from),
            currency,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    get_optional_env(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an `http(s)` URL from a variable.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// `scheme://host[:port]/` of a URL.
fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}
