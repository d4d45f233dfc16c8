//! Integration tests for Tangelo Market.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p tangelo-cli -- migrate
//!
//! # Start the dashboard
//! cargo run -p tangelo-dashboard
//!
//! # Run the (otherwise ignored) integration tests
//! cargo test -p tangelo-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `dashboard_wizard` - Store onboarding wizard flow over HTTP
//! - `dashboard_categories` - Admin category CRUD and conflict handling

use reqwest::Client;

/// Base URL for the dashboard (configurable via environment).
#[must_use]
pub fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3002".to_string())
}

/// Build an HTTP client with a cookie store, so sessions persist across
/// requests the way a browser's would.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway seller account and leave its session in the
/// client's cookie store. Requires the account to have been promoted to
/// seller out of band (`tangelo-cli user promote`) for wizard tests.
pub async fn register_account(client: &Client, email: &str, password: &str) {
    let base_url = dashboard_base_url();
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .form(&[("name", "Test Seller"), ("email", email), ("password", password)])
        .send()
        .await
        .expect("Failed to register");

    assert!(
        resp.status().is_success() || resp.status().is_redirection(),
        "registration failed with {}",
        resp.status()
    );
}
