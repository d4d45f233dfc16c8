//! Category management route handlers (admin).

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tracing::instrument;

use tangelo_core::CategoryId;

use crate::actions::{CategoryForm, upsert_category};
use crate::db::{CategoryRepository, PgCategoryRepository};
use crate::middleware::RequireAdmin;
use crate::models::Category;
use crate::state::AppState;

use super::render;

/// Category list page template.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<Category>,
    pub notice: Option<String>,
}

/// Category create/edit form template.
#[derive(Template)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub category: Option<Category>,
    pub error: Option<String>,
}

/// Category list page handler.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Html<String> {
    let repo = PgCategoryRepository::new(state.pool());
    let categories = match repo.list().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!("Failed to list categories: {e}");
            vec![]
        }
    };

    render(&CategoriesIndexTemplate {
        categories,
        notice: None,
    })
}

/// New category form handler.
pub async fn new_category(RequireAdmin(_admin): RequireAdmin) -> Html<String> {
    render(&CategoryFormTemplate {
        category: None,
        error: None,
    })
}

/// Create category handler.
#[instrument(skip(admin, state, input), fields(name = %input.name))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(input): Form<CategoryForm>,
) -> impl IntoResponse {
    let repo = PgCategoryRepository::new(state.pool());
    let result = upsert_category(&repo, Some(&admin), &input, None).await;

    if result.success {
        tracing::info!(name = %input.name, "Category created");
        Redirect::to("/dashboard/admin/categories").into_response()
    } else {
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&CategoryFormTemplate {
                category: None,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}

/// Edit category form handler.
#[instrument(skip(_admin, state))]
pub async fn edit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> impl IntoResponse {
    let repo = PgCategoryRepository::new(state.pool());
    match repo.get(id).await {
        Ok(Some(category)) => render(&CategoryFormTemplate {
            category: Some(category),
            error: None,
        })
        .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Category not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch category: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch category",
            )
                .into_response()
        }
    }
}

/// Update category handler.
#[instrument(skip(admin, state, input), fields(name = %input.name))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Form(input): Form<CategoryForm>,
) -> impl IntoResponse {
    let repo = PgCategoryRepository::new(state.pool());
    let result = upsert_category(&repo, Some(&admin), &input, Some(id)).await;

    if result.success {
        tracing::info!(category_id = %id, "Category updated");
        Redirect::to("/dashboard/admin/categories").into_response()
    } else {
        let category = repo.get(id).await.ok().flatten();
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&CategoryFormTemplate {
                category,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}

/// Delete category handler.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> impl IntoResponse {
    let repo = PgCategoryRepository::new(state.pool());
    match repo.delete(id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "Category deleted");
            Redirect::to("/dashboard/admin/categories").into_response()
        }
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to delete category");
            (StatusCode::BAD_REQUEST, format!("Failed to delete: {e}")).into_response()
        }
    }
}
