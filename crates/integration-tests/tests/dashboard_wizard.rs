//! Integration tests for the store onboarding wizard.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The dashboard server running (cargo run -p tangelo-dashboard)
//! - A seller account (see `tangelo-cli user create -r seller`)
//!
//! Run with: cargo test -p tangelo-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use uuid::Uuid;

use tangelo_integration_tests::{dashboard_base_url, session_client};

/// Log in with the seller credentials from the environment.
async fn seller_client() -> Client {
    let client = session_client();
    let base_url = dashboard_base_url();
    let email =
        std::env::var("TEST_SELLER_EMAIL").unwrap_or_else(|_| "seller@tangelo.test".to_string());
    let password =
        std::env::var("TEST_SELLER_PASSWORD").unwrap_or_else(|_| "integration-tests".to_string());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.status().is_success() || resp.status().is_redirection());

    client
}

#[tokio::test]
#[ignore = "Requires running dashboard server and a seller account"]
async fn test_wizard_starts_at_step_one() {
    let client = seller_client().await;
    let base_url = dashboard_base_url();

    let resp = client
        .get(format!("{base_url}/dashboard/seller/stores/new"))
        .send()
        .await
        .expect("Failed to open wizard");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().ends_with("/step/1"));

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Store details"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and a seller account"]
async fn test_step_validation_blocks_advance() {
    let client = seller_client().await;
    let base_url = dashboard_base_url();

    // Post step 1 with no name: the step page re-renders with errors
    // instead of redirecting to step 2.
    let resp = client
        .post(format!("{base_url}/dashboard/seller/stores/new/step/1"))
        .form(&[("description", "A store without a name")])
        .send()
        .await
        .expect("Failed to post step");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().ends_with("/step/1"));
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Store name is required"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and a seller account"]
async fn test_draft_survives_navigation() {
    let client = seller_client().await;
    let base_url = dashboard_base_url();
    let name = format!("Wizard Test {}", Uuid::new_v4());

    // Complete step 1
    let resp = client
        .post(format!("{base_url}/dashboard/seller/stores/new/step/1"))
        .form(&[
            ("name", name.as_str()),
            ("description", "Integration test store"),
            ("logo_url", "http://img.test/logo.png"),
            ("logo_public_id", "test/logo"),
            ("cover_url", "http://img.test/cover.png"),
            ("cover_public_id", "test/cover"),
        ])
        .send()
        .await
        .expect("Failed to post step");
    assert!(resp.url().path().ends_with("/step/2"));

    // Go back; the step 1 form re-renders with the saved name
    let resp = client
        .post(format!("{base_url}/dashboard/seller/stores/new/back"))
        .send()
        .await
        .expect("Failed to go back");
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains(&name));

    // Clean up the draft so later tests start fresh
    let resp = client
        .post(format!("{base_url}/dashboard/seller/stores/new/abandon"))
        .send()
        .await
        .expect("Failed to abandon");
    assert!(resp.status().is_success() || resp.status().is_redirection());
}

#[tokio::test]
#[ignore = "Requires running dashboard server and a seller account"]
async fn test_full_wizard_submission_creates_store() {
    let client = seller_client().await;
    let base_url = dashboard_base_url();
    let suffix = Uuid::new_v4().simple().to_string();
    let name = format!("Acme {suffix}");
    // Phones only accept digits; derive some from the UUID bytes
    let phone_digits: String = Uuid::new_v4()
        .as_bytes()
        .iter()
        .map(|b| char::from(b'0' + b % 10))
        .take(7)
        .collect();

    // Step 1: details
    client
        .post(format!("{base_url}/dashboard/seller/stores/new/step/1"))
        .form(&[
            ("name", name.as_str()),
            ("description", "Integration test store"),
            ("logo_url", "http://img.test/logo.png"),
            ("logo_public_id", "test/logo"),
            ("cover_url", "http://img.test/cover.png"),
            ("cover_public_id", "test/cover"),
        ])
        .send()
        .await
        .expect("Failed to post step 1");

    // Step 2: contact (unique email/phone per run)
    client
        .post(format!("{base_url}/dashboard/seller/stores/new/step/2"))
        .form(&[
            ("email", format!("store-{suffix}@tangelo.test").as_str()),
            ("phone", format!("+1555{phone_digits}").as_str()),
        ])
        .send()
        .await
        .expect("Failed to post step 2");

    // Step 3: shipping, all defaults
    client
        .post(format!("{base_url}/dashboard/seller/stores/new/step/3"))
        .form(&[("shipping_service", "")])
        .send()
        .await
        .expect("Failed to post step 3");

    // Final submission
    let resp = client
        .post(format!("{base_url}/dashboard/seller/stores/new/submit"))
        .send()
        .await
        .expect("Failed to submit");
    assert!(resp.status().is_success() || resp.status().is_redirection());

    // The new store shows up in the seller's store list
    let body = client
        .get(format!("{base_url}/dashboard/seller/stores"))
        .send()
        .await
        .expect("Failed to list stores")
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains(&name));
}
