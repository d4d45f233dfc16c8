//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Home
//! GET  /                       - Role-aware dashboard landing page
//!
//! # Auth (email/password)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login
//! GET  /auth/register          - Registration page
//! POST /auth/register          - Register
//! POST /auth/logout            - Logout
//!
//! # Categories (admin)
//! GET  /dashboard/admin/categories             - List
//! GET  /dashboard/admin/categories/new         - Create form
//! POST /dashboard/admin/categories             - Create
//! GET  /dashboard/admin/categories/{id}/edit   - Edit form
//! POST /dashboard/admin/categories/{id}        - Update
//! POST /dashboard/admin/categories/{id}/delete - Delete
//!
//! # Subcategories (admin)
//! Same shape under /dashboard/admin/subcategories
//!
//! # Store onboarding wizard (seller)
//! GET  /dashboard/seller/stores/new            - Resume at the current step
//! GET  /dashboard/seller/stores/new/step/{n}   - Render step n
//! POST /dashboard/seller/stores/new/step/{n}   - Save step input, validate, advance
//! POST /dashboard/seller/stores/new/back       - Go back one step
//! POST /dashboard/seller/stores/new/abandon    - Discard the draft
//! POST /dashboard/seller/stores/new/submit     - Final submission
//!
//! # Stores (seller)
//! GET  /dashboard/seller/stores                    - Own stores
//! GET  /dashboard/seller/stores/{slug}/settings    - Settings form
//! POST /dashboard/seller/stores/{slug}/settings    - Update store
//! GET  /dashboard/seller/stores/{slug}/shipping    - Shipping rates
//! POST /dashboard/seller/stores/{slug}/shipping    - Upsert one country rate
//! GET  /dashboard/seller/stores/{slug}/products    - Product list
//! GET  /dashboard/seller/stores/{slug}/products/new        - Product form
//! GET  /dashboard/seller/stores/{slug}/products/{id}/edit  - Product form (edit)
//! POST /dashboard/seller/stores/{slug}/products/{id}/delete - Delete product
//!
//! # JSON API (fetch-driven forms)
//! POST /api/media/upload       - Multipart image upload -> {url, public_id}
//! POST /api/products           - Create product aggregate
//! PUT  /api/products/{id}      - Update product aggregate
//! ```

pub mod auth;
pub mod categories;
pub mod home;
pub mod media;
pub mod products;
pub mod shipping;
pub mod stores;
pub mod subcategories;
pub mod wizard;

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Render a template, logging failures instead of bubbling them to the
/// client as a 500 body dump.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home
        .route("/", get(home::index))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/register", get(auth::register_page).post(auth::register))
        .route("/auth/logout", post(auth::logout))
        // Categories (admin)
        .route(
            "/dashboard/admin/categories",
            get(categories::index).post(categories::create),
        )
        .route("/dashboard/admin/categories/new", get(categories::new_category))
        .route("/dashboard/admin/categories/{id}/edit", get(categories::edit))
        .route("/dashboard/admin/categories/{id}", post(categories::update))
        .route(
            "/dashboard/admin/categories/{id}/delete",
            post(categories::delete),
        )
        // Subcategories (admin)
        .route(
            "/dashboard/admin/subcategories",
            get(subcategories::index).post(subcategories::create),
        )
        .route(
            "/dashboard/admin/subcategories/new",
            get(subcategories::new_subcategory),
        )
        .route(
            "/dashboard/admin/subcategories/{id}/edit",
            get(subcategories::edit),
        )
        .route("/dashboard/admin/subcategories/{id}", post(subcategories::update))
        .route(
            "/dashboard/admin/subcategories/{id}/delete",
            post(subcategories::delete),
        )
        // Store onboarding wizard (seller)
        .route("/dashboard/seller/stores/new", get(wizard::resume))
        .route(
            "/dashboard/seller/stores/new/step/{ordinal}",
            get(wizard::step_page).post(wizard::submit_step),
        )
        .route("/dashboard/seller/stores/new/back", post(wizard::back))
        .route("/dashboard/seller/stores/new/abandon", post(wizard::abandon))
        .route("/dashboard/seller/stores/new/submit", post(wizard::submit))
        // Stores (seller)
        .route("/dashboard/seller/stores", get(stores::index))
        .route(
            "/dashboard/seller/stores/{slug}/settings",
            get(stores::settings).post(stores::update),
        )
        .route(
            "/dashboard/seller/stores/{slug}/shipping",
            get(shipping::index).post(shipping::upsert),
        )
        .route("/dashboard/seller/stores/{slug}/products", get(products::index))
        .route(
            "/dashboard/seller/stores/{slug}/products/new",
            get(products::new_product),
        )
        .route(
            "/dashboard/seller/stores/{slug}/products/{id}/edit",
            get(products::edit),
        )
        .route(
            "/dashboard/seller/stores/{slug}/products/{id}/delete",
            post(products::delete),
        )
        // JSON API
        .route("/api/media/upload", post(media::upload))
        .route("/api/products", post(products::api_create))
        .route("/api/products/{id}", put(products::api_update))
}
