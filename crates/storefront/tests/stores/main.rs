//! HTTP-level tests for the storefront stores.
//!
//! Uses wiremock to stand in for the REST API and verifies the requests each
//! store sends and how it folds the responses into local state.

mod common;

mod test_api_client;
mod test_cart;
mod test_favorites;
