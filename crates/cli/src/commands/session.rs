//! Session token management.
//!
//! Signing in happens outside this tool; the token it produced is saved here
//! and sent as a bearer token on later runs.

use std::io::Write;

use rigshop_storefront::StoreError;
use rigshop_storefront::session::{FileTokenStore, TokenStore};
use secrecy::SecretString;
use serde::Serialize;

use super::Context;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SessionStatus {
    signed_in: bool,
    source: Option<String>,
    valid: Option<bool>,
}

/// Save a token to the session file.
///
/// # Errors
///
/// Returns an error if the session file cannot be written.
pub fn set_token(ctx: &Context, out: &mut impl Write, token: &str) -> Result<(), CliError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(StoreError::Invalid("Token is empty".to_string()).into());
    }

    let store = FileTokenStore::open(&ctx.config.token_file)?;
    store.set_token(SecretString::from(token.to_string()))?;

    ctx.output
        .note(out, &format!("Token saved to {}", store.path().display()))?;
    if ctx.token_from_env {
        ctx.output
            .note(out, "Note: RIGSHOP_TOKEN is set and takes precedence over the saved token")?;
    }
    Ok(())
}

/// Remove the session file.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn clear(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let store = FileTokenStore::open(&ctx.config.token_file)?;
    store.clear()?;
    ctx.output.note(out, "Signed out")
}

/// Report whether a token is available and whether the server accepts it.
///
/// # Errors
///
/// Returns an error if the server cannot be reached.
pub async fn status(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    let api = ctx.storefront.api();
    if !api.has_token() {
        let status = SessionStatus {
            signed_in: false,
            source: None,
            valid: None,
        };
        return ctx
            .output
            .emit(out, &status, |out| writeln!(out, "Signed out"));
    }

    let source = if ctx.token_from_env {
        "RIGSHOP_TOKEN".to_string()
    } else {
        ctx.config.token_file.display().to_string()
    };

    // Favorites require a session, so fetching them validates the token.
    let favorites = ctx.storefront.favorites();
    let valid = match favorites.refresh_favorites().await {
        Ok(()) => true,
        Err(StoreError::SessionExpired) => false,
        Err(err) => return Err(err.into()),
    };

    let status = SessionStatus {
        signed_in: valid,
        source: Some(source.clone()),
        valid: Some(valid),
    };
    let count = favorites.favorite_count().await;
    ctx.output.emit(out, &status, |out| {
        if valid {
            writeln!(out, "Signed in (token from {source})")?;
            writeln!(out, "{count} favorite(s) saved")
        } else {
            writeln!(out, "Session expired (token from {source})")
        }
    })
}
