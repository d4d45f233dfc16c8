//! Product route handlers (seller).
//!
//! Page handlers render the product list and form; the form itself posts
//! JSON to the `/api/products` endpoints because the variant editor is a
//! dynamic nested structure (sizes, colors, images, specs per variant)
//! that doesn't flatten into urlencoded fields.

use askama::Template;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use tangelo_core::ProductId;

use crate::actions::{ActionResult, ProductForm, upsert_product};
use crate::db::{PgProductRepository, PgStoreRepository, ProductRepository};
use crate::middleware::RequireSeller;
use crate::models::{Product, Store};
use crate::state::AppState;

use super::render;
use super::stores::owned_store;

/// Product list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub store: Store,
    pub products: Vec<Product>,
}

/// Product create/edit form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub store: Store,
    pub product_json: String,
    pub product_id: Option<ProductId>,
}

/// Product list page handler.
#[instrument(skip(seller, state))]
pub async fn index(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let repo = PgProductRepository::new(state.pool());
    let products = match repo.list_for_store(store.id).await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Failed to list products: {e}");
            vec![]
        }
    };

    render(&ProductsIndexTemplate { store, products }).into_response()
}

/// New product form handler.
#[instrument(skip(seller, state))]
pub async fn new_product(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    render(&ProductFormTemplate {
        store,
        product_json: "null".to_string(),
        product_id: None,
    })
    .into_response()
}

/// Edit product form handler.
#[instrument(skip(seller, state))]
pub async fn edit(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, ProductId)>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let repo = PgProductRepository::new(state.pool());
    match repo.get(id).await {
        Ok(Some(product)) if product.store_id == store.id => {
            let product_json = serde_json::to_string(&product).unwrap_or_else(|e| {
                tracing::error!("Failed to serialize product: {e}");
                "null".to_string()
            });
            render(&ProductFormTemplate {
                store,
                product_json,
                product_id: Some(id),
            })
            .into_response()
        }
        Ok(Some(_)) => (StatusCode::FORBIDDEN, "Unauthorized").into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch product: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch product").into_response()
        }
    }
}

/// Delete product handler.
#[instrument(skip(seller, state))]
pub async fn delete(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, ProductId)>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let repo = PgProductRepository::new(state.pool());
    // Never delete across store boundaries, even with a valid id.
    match repo.get(id).await {
        Ok(Some(product)) if product.store_id == store.id => match repo.delete(id).await {
            Ok(()) => {
                tracing::info!(product_id = %id, "Product deleted");
                Redirect::to(&format!("/dashboard/seller/stores/{slug}/products")).into_response()
            }
            Err(e) => {
                tracing::error!(product_id = %id, error = %e, "Failed to delete product");
                (StatusCode::BAD_REQUEST, format!("Failed to delete: {e}")).into_response()
            }
        },
        Ok(Some(_)) => (StatusCode::FORBIDDEN, "Unauthorized").into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch product: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch product").into_response()
        }
    }
}

fn action_response(result: ActionResult<Product>) -> impl IntoResponse {
    let status = StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::OK);
    (status, Json(result))
}

/// JSON API: create a product aggregate.
#[instrument(skip(seller, state, form), fields(name = %form.name))]
pub async fn api_create(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> impl IntoResponse {
    let products = PgProductRepository::new(state.pool());
    let stores = PgStoreRepository::new(state.pool());
    action_response(upsert_product(&products, &stores, Some(&seller), &form, None).await)
}

/// JSON API: update a product aggregate.
#[instrument(skip(seller, state, form), fields(name = %form.name))]
pub async fn api_update(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> impl IntoResponse {
    let products = PgProductRepository::new(state.pool());
    let stores = PgStoreRepository::new(state.pool());
    action_response(upsert_product(&products, &stores, Some(&seller), &form, Some(id)).await)
}
