//! Subcategory management route handlers (admin).

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tracing::instrument;

use tangelo_core::SubcategoryId;

use crate::actions::{SubcategoryForm, upsert_subcategory};
use crate::db::{
    CategoryRepository, PgCategoryRepository, PgSubcategoryRepository, SubcategoryRepository,
};
use crate::middleware::RequireAdmin;
use crate::models::{Category, Subcategory};
use crate::state::AppState;

use super::render;

/// Subcategory list page template.
#[derive(Template)]
#[template(path = "subcategories/index.html")]
pub struct SubcategoriesIndexTemplate {
    pub subcategories: Vec<Subcategory>,
}

/// Subcategory create/edit form template.
#[derive(Template)]
#[template(path = "subcategories/form.html")]
pub struct SubcategoryFormTemplate {
    pub subcategory: Option<Subcategory>,
    pub categories: Vec<Category>,
    pub error: Option<String>,
}

async fn category_options(state: &AppState) -> Vec<Category> {
    let repo = PgCategoryRepository::new(state.pool());
    match repo.list().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!("Failed to list categories: {e}");
            vec![]
        }
    }
}

/// Subcategory list page handler.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Html<String> {
    let repo = PgSubcategoryRepository::new(state.pool());
    let subcategories = match repo.list().await {
        Ok(subcategories) => subcategories,
        Err(e) => {
            tracing::error!("Failed to list subcategories: {e}");
            vec![]
        }
    };

    render(&SubcategoriesIndexTemplate { subcategories })
}

/// New subcategory form handler.
pub async fn new_subcategory(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Html<String> {
    render(&SubcategoryFormTemplate {
        subcategory: None,
        categories: category_options(&state).await,
        error: None,
    })
}

/// Create subcategory handler.
#[instrument(skip(admin, state, input), fields(name = %input.name))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(input): Form<SubcategoryForm>,
) -> impl IntoResponse {
    let subcategories = PgSubcategoryRepository::new(state.pool());
    let categories = PgCategoryRepository::new(state.pool());
    let result = upsert_subcategory(&subcategories, &categories, Some(&admin), &input, None).await;

    if result.success {
        tracing::info!(name = %input.name, "Subcategory created");
        Redirect::to("/dashboard/admin/subcategories").into_response()
    } else {
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&SubcategoryFormTemplate {
                subcategory: None,
                categories: category_options(&state).await,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}

/// Edit subcategory form handler.
#[instrument(skip(_admin, state))]
pub async fn edit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> impl IntoResponse {
    let repo = PgSubcategoryRepository::new(state.pool());
    match repo.get(id).await {
        Ok(Some(subcategory)) => render(&SubcategoryFormTemplate {
            subcategory: Some(subcategory),
            categories: category_options(&state).await,
            error: None,
        })
        .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Subcategory not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch subcategory: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch subcategory",
            )
                .into_response()
        }
    }
}

/// Update subcategory handler.
#[instrument(skip(admin, state, input), fields(name = %input.name))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
    Form(input): Form<SubcategoryForm>,
) -> impl IntoResponse {
    let subcategories = PgSubcategoryRepository::new(state.pool());
    let categories = PgCategoryRepository::new(state.pool());
    let result =
        upsert_subcategory(&subcategories, &categories, Some(&admin), &input, Some(id)).await;

    if result.success {
        tracing::info!(subcategory_id = %id, "Subcategory updated");
        Redirect::to("/dashboard/admin/subcategories").into_response()
    } else {
        let subcategory = subcategories.get(id).await.ok().flatten();
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&SubcategoryFormTemplate {
                subcategory,
                categories: category_options(&state).await,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}

/// Delete subcategory handler.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SubcategoryId>,
) -> impl IntoResponse {
    let repo = PgSubcategoryRepository::new(state.pool());
    match repo.delete(id).await {
        Ok(()) => {
            tracing::info!(subcategory_id = %id, "Subcategory deleted");
            Redirect::to("/dashboard/admin/subcategories").into_response()
        }
        Err(e) => {
            tracing::error!(subcategory_id = %id, error = %e, "Failed to delete subcategory");
            (StatusCode::BAD_REQUEST, format!("Failed to delete: {e}")).into_response()
        }
    }
}
