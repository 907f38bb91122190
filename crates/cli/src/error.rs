//! CLI error type.

use std::io;

use rigshop_storefront::StoreError;
use rigshop_storefront::api::ApiError;
use rigshop_storefront::config::ConfigError;
use rigshop_storefront::session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Extra line printed under the error, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Store(err) if err.needs_sign_in() => {
                Some("Save a token with `rigshop session set-token <TOKEN>`")
            }
            Self::Config(ConfigError::MissingEnvVar(_)) => {
                Some("Set RIGSHOP_API_URL (a .env file in the working directory is read too)")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_keep_user_message() {
        let err = CliError::from(StoreError::Rejected("Only 2 left in stock".to_string()));
        assert_eq!(err.to_string(), "Only 2 left in stock");
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_sign_in_hint() {
        assert!(CliError::from(StoreError::NotSignedIn).hint().is_some());
        assert!(CliError::from(StoreError::SessionExpired).hint().is_some());
        assert!(
            CliError::from(ConfigError::MissingEnvVar("RIGSHOP_API_URL".to_string()))
                .hint()
                .is_some()
        );
    }
}
