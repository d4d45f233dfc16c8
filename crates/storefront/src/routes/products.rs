//! Product detail page handler.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{NavCategory, ProductPage};
use crate::state::AppState;

use super::render;

/// Product page template.
#[derive(Template)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub nav: Vec<NavCategory>,
    pub product: ProductPage,
}

/// Product detail page handler.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>> {
    let repo = CatalogRepository::new(state.pool());
    let product = repo
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    Ok(render(&ProductTemplate {
        nav: state.category_tree().await.as_ref().clone(),
        product,
    }))
}
