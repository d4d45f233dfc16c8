//! Product search handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::filters;
use crate::error::Result;
use crate::models::{NavCategory, ProductCard};
use crate::state::AppState;

use super::render;

/// Maximum search results per page.
const SEARCH_LIMIT: i64 = 48;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Search page template.
#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub nav: Vec<NavCategory>,
    pub query: String,
    pub products: Vec<ProductCard>,
}

/// Search page handler. An empty query renders the empty state without
/// touching the database.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Html<String>> {
    let query = params.q.unwrap_or_default().trim().to_owned();

    let products = if query.is_empty() {
        vec![]
    } else {
        let repo = CatalogRepository::new(state.pool());
        repo.search_products(&query, SEARCH_LIMIT).await?
    };

    Ok(render(&SearchTemplate {
        nav: state.category_tree().await.as_ref().clone(),
        query,
        products,
    }))
}
