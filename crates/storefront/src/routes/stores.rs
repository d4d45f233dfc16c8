//! Public store page handler.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::filters;
use crate::error::{AppError, Result};
use crate::models::{NavCategory, ProductCard, StorePage};
use crate::state::AppState;

use super::render;

/// Maximum products on a store page.
const STORE_PAGE_LIMIT: i64 = 48;

/// Store page template.
#[derive(Template)]
#[template(path = "store.html")]
pub struct StoreTemplate {
    pub nav: Vec<NavCategory>,
    pub store: StorePage,
    pub products: Vec<ProductCard>,
}

/// Public store page handler. Only active stores resolve.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>> {
    let repo = CatalogRepository::new(state.pool());
    let store = repo
        .store_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {slug}")))?;
    let products = repo.products_for_store(&slug, STORE_PAGE_LIMIT).await?;

    Ok(render(&StoreTemplate {
        nav: state.category_tree().await.as_ref().clone(),
        store,
        products,
    }))
}
