//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET /health            - Health check
//! GET /                  - Home page (latest products)
//! GET /search?q=...      - Product search
//! GET /category/{slug}   - Products of one category
//! GET /product/{slug}    - Product detail
//! GET /store/{slug}      - Public store page
//! ```

pub mod home;
pub mod products;
pub mod search;
pub mod stores;

use askama::Template;
use axum::{Router, response::Html, routing::get};

use crate::state::AppState;

/// Render a template, logging failures instead of bubbling them to the
/// client as a 500 body dump.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Build the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/search", get(search::index))
        .route("/category/{slug}", get(home::category))
        .route("/product/{slug}", get(products::show))
        .route("/store/{slug}", get(stores::show))
}
