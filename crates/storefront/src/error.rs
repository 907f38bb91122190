//! User-facing errors returned by the stores and services.
//!
//! Transport-level [`ApiError`]s are translated here so that callers only
//! ever see a `StoreError`, whose `Display` is the message shown to the user.

use rigshop_core::AddressError;
use thiserror::Error;

use crate::api::ApiError;

/// Error type for every store and service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No bearer token is available.
    #[error("Please sign in to continue")]
    NotSignedIn,

    /// The server rejected the token.
    #[error("Your session has expired, please sign in again")]
    SessionExpired,

    /// The server refused the operation; its message is passed through.
    #[error("{0}")]
    Rejected(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API could not be reached or answered with garbage.
    #[error("The store is unavailable right now, please try again later")]
    Unavailable,

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Invalid(String),
}

impl StoreError {
    /// Whether the caller should ask the user to sign in.
    #[must_use]
    pub const fn needs_sign_in(&self) -> bool {
        matches!(self, Self::NotSignedIn | Self::SessionExpired)
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::SessionExpired,
            ApiError::Api { message, .. } => Self::Rejected(message),
            ApiError::NotFound(message) => Self::NotFound(message),
            ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_) => Self::Unavailable,
        }
    }
}

impl From<AddressError> for StoreError {
    fn from(err: AddressError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Log a failed API call and translate it.
pub(crate) fn log_failure(operation: &'static str, err: ApiError) -> StoreError {
    match &err {
        ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_) => {
            tracing::error!(operation, error = %err, "Storefront request failed");
        }
        ApiError::Unauthorized { .. } | ApiError::Api { .. } | ApiError::NotFound(_) => {
            tracing::warn!(operation, error = %err, "Storefront request rejected");
        }
    }
    StoreError::from(err)
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
