//! Home and category page handlers.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::filters;
use crate::error::{AppError, Result};
use crate::models::{NavCategory, ProductCard};
use crate::state::AppState;

use super::render;

/// Number of product cards on the home page.
const HOME_PAGE_LIMIT: i64 = 24;
/// Number of product cards on a category page.
const CATEGORY_PAGE_LIMIT: i64 = 48;

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Vec<NavCategory>,
    pub products: Vec<ProductCard>,
}

/// Category page template.
#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate {
    pub nav: Vec<NavCategory>,
    pub category_name: String,
    pub products: Vec<ProductCard>,
}

/// Home page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let repo = CatalogRepository::new(state.pool());
    let products = repo.latest_products(HOME_PAGE_LIMIT).await?;

    Ok(render(&HomeTemplate {
        nav: state.category_tree().await.as_ref().clone(),
        products,
    }))
}

/// Category page handler.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>> {
    let nav = state.category_tree().await.as_ref().clone();
    let category_name = nav
        .iter()
        .find(|c| c.slug.as_str() == slug)
        .map(|c| c.name.clone())
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let repo = CatalogRepository::new(state.pool());
    let products = repo.products_in_category(&slug, CATEGORY_PAGE_LIMIT).await?;

    Ok(render(&CategoryTemplate {
        nav,
        category_name,
        products,
    }))
}
