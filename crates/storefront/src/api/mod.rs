//! REST client for the Rigshop API.
//!
//! # Architecture
//!
//! - One `reqwest::Client` shared behind an `Arc`; the handle is cheap to clone
//! - `Authorization: Bearer <token>` read from the [`TokenStore`] on every request
//! - Responses are unwrapped from the optional `{"data": ...}` envelope and
//!   handed to `rigshop_core::normalize` as raw JSON
//! - Status codes pass through as [`ApiError`] variants; nothing is retried
//!
//! # Example
//!
//! ```rust,ignore
//! use rigshop_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config, tokens)?;
//! let cart = client.get_cart().await?;
//! ```

mod endpoints;
mod query;

pub use query::{ProductQuery, ProductSort};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::session::TokenStore;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the bearer token (401 or 403).
    #[error("Unauthorized ({status})")]
    Unauthorized { status: u16 },

    /// Server answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    asset_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::build(
            config.api_url.as_str(),
            config.asset_url.clone(),
            config.timeout,
            tokens,
        )
    }

    /// Create a client against an arbitrary base URL (mock servers, staging).
    ///
    /// Relative image paths resolve against the same URL.
    ///
    /// # Errors
    ///
    /// Returns error if `base_url` is not a valid URL or the HTTP client
    /// fails to build.
    pub fn with_base_url(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let asset_url = Url::parse(base_url)?;
        Self::build(base_url, asset_url, DEFAULT_TIMEOUT, tokens)
    }

    fn build(
        base_url: &str,
        asset_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rigshop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                asset_url,
                tokens,
            }),
        })
    }

    /// Whether a bearer token is currently available.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.tokens.has_token()
    }

    /// The token store shared by this client.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Base URL for relative image paths.
    #[must_use]
    pub fn asset_url(&self) -> &Url {
        &self.inner.asset_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None::<&()>, &[]).await
    }

    pub(crate) async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None::<&()>, query).await
    }

    pub(crate) async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.send(Method::POST, path, Some(body), &[]).await
    }

    pub(crate) async fn put<B: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, body, &[]).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, None::<&()>, &[]).await
    }

    /// Execute a request and return the unwrapped JSON payload.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let mut url = self.url(path);
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }

        let mut request = self.inner.client.request(method, url);
        if let Some(token) = self.inner.tokens.token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = error_message(&response_text)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            tracing::debug!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let payload: Value = match serde_json::from_str(&response_text) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        // Some endpoints answer 200 with {"success": false, "message": ...}
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&response_text)
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }

        debug!(status = %status, "API request succeeded");
        Ok(unwrap_envelope(payload))
    }
}

/// Strip the `{"data": ...}` wrapper some endpoints use.
///
/// Keys beside `data` (such as `pagination`) are kept: merged into an object
/// payload without overwriting, or returned next to an array as `items`.
fn unwrap_envelope(payload: Value) -> Value {
    let mut object = match payload {
        Value::Object(object) => object,
        other => return other,
    };
    let Some(data) = object.remove("data") else {
        return Value::Object(object);
    };
    object.remove("success");
    object.remove("message");
    if object.is_empty() {
        return data;
    }

    match data {
        Value::Object(mut inner) => {
            for (key, value) in object {
                inner.entry(key).or_insert(value);
            }
            Value::Object(inner)
        }
        Value::Array(items) => {
            object.insert("items".to_string(), Value::Array(items));
            Value::Object(object)
        }
        other => other,
    }
}

/// User-facing message from an error body (`message` or `error`).
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| match value.get(*key) {
        Some(Value::String(message)) if !message.trim().is_empty() => {
            Some(message.trim().to_string())
        }
        Some(Value::Object(nested)) => nested
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}
