//! Store management route handlers (seller).

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tracing::instrument;

use tangelo_core::Slug;

use crate::actions::submit_store;
use crate::db::{PgStoreRepository, StoreRepository};
use crate::middleware::RequireSeller;
use crate::models::{CurrentUser, Store};
use crate::state::AppState;
use crate::wizard::StoreDraft;

use super::render;
use super::wizard::StepForm;

/// Store list page template.
#[derive(Template)]
#[template(path = "stores/index.html")]
pub struct StoresIndexTemplate {
    pub stores: Vec<Store>,
}

/// Store settings form template.
#[derive(Template)]
#[template(path = "stores/settings.html")]
pub struct StoreSettingsTemplate {
    pub store: Store,
    pub error: Option<String>,
}

/// Resolve a store by slug, checking it belongs to the caller.
pub(crate) async fn owned_store(
    state: &AppState,
    user: &CurrentUser,
    slug: &str,
) -> Result<Store, axum::response::Response> {
    let slug = Slug::parse(slug)
        .map_err(|_| (StatusCode::NOT_FOUND, "Store not found").into_response())?;

    let repo = PgStoreRepository::new(state.pool());
    match repo.get_by_slug(&slug).await {
        Ok(Some(store)) if store.owner_id == user.id => Ok(store),
        Ok(Some(_)) => Err((StatusCode::FORBIDDEN, "Unauthorized").into_response()),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Store not found").into_response()),
        Err(e) => {
            tracing::error!("Failed to fetch store: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch store").into_response())
        }
    }
}

/// Build a complete draft from a store's persisted fields.
///
/// The settings form round-trips through the same draft validation the
/// wizard uses, so update and create share one schema.
fn draft_from_store(store: &Store) -> StoreDraft {
    StoreDraft {
        name: Some(store.name.clone()),
        description: Some(store.description.clone()),
        slug: Some(store.slug.as_str().to_owned()),
        email: Some(store.email.as_str().to_owned()),
        phone: Some(store.phone.as_str().to_owned()),
        logo_url: Some(store.logo_url.clone()),
        logo_public_id: Some(store.logo_public_id.clone()),
        cover_url: Some(store.cover_url.clone()),
        cover_public_id: Some(store.cover_public_id.clone()),
        shipping_service: Some(store.shipping.shipping_service.clone()),
        fee_per_item: Some(store.shipping.fee_per_item),
        fee_additional_item: Some(store.shipping.fee_additional_item),
        fee_per_kg: Some(store.shipping.fee_per_kg),
        fee_fixed: Some(store.shipping.fee_fixed),
        delivery_min_days: Some(store.shipping.delivery_min_days),
        delivery_max_days: Some(store.shipping.delivery_max_days),
        return_policy: Some(store.shipping.return_policy.clone()),
    }
}

/// Store list page handler.
#[instrument(skip(seller, state))]
pub async fn index(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
) -> Html<String> {
    let repo = PgStoreRepository::new(state.pool());
    let stores = match repo.list_for_owner(seller.id).await {
        Ok(stores) => stores,
        Err(e) => {
            tracing::error!("Failed to list stores: {e}");
            vec![]
        }
    };

    render(&StoresIndexTemplate { stores })
}

/// Store settings page handler.
#[instrument(skip(seller, state))]
pub async fn settings(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    match owned_store(&state, &seller, &slug).await {
        Ok(store) => render(&StoreSettingsTemplate { store, error: None }).into_response(),
        Err(response) => response,
    }
}

/// Store settings update handler.
#[instrument(skip(seller, state, form))]
pub async fn update(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<StepForm>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    // Start from the persisted record and overlay the posted fields, so a
    // partial form cannot silently blank anything.
    let mut draft = draft_from_store(&store);
    let (patch, parse_errors) = form.into_patch();
    draft.apply(patch);

    if !parse_errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            render(&StoreSettingsTemplate {
                store,
                error: Some(parse_errors.to_string()),
            }),
        )
            .into_response();
    }

    let repo = PgStoreRepository::new(state.pool());
    let result = submit_store(&repo, Some(&seller), &draft, Some(store.id)).await;

    if result.success {
        tracing::info!(store_id = %store.id, "Store updated");
        let target = result
            .redirect_url
            .unwrap_or_else(|| format!("/dashboard/seller/stores/{slug}/settings"));
        Redirect::to(&target).into_response()
    } else {
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&StoreSettingsTemplate {
                store,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tangelo_core::{Email, Phone, StoreId, StoreStatus, UserId};

    use crate::models::ShippingDefaults;
    use crate::validate::validate_store_draft;

    #[test]
    fn test_draft_from_store_is_complete_and_valid() {
        let now = Utc::now();
        let store = Store {
            id: StoreId::new(1),
            owner_id: UserId::new(1),
            name: "Acme".to_string(),
            slug: tangelo_core::Slug::parse("acme").unwrap(),
            description: "desc".to_string(),
            email: Email::parse("acme@tangelo.test").unwrap(),
            phone: Phone::parse("+15551234567").unwrap(),
            logo_url: "http://img/logo.png".to_string(),
            logo_public_id: "logo".to_string(),
            cover_url: "http://img/cover.png".to_string(),
            cover_public_id: "cover".to_string(),
            status: StoreStatus::Active,
            featured: false,
            shipping: ShippingDefaults {
                shipping_service: "Post".to_string(),
                fee_per_item: Decimal::ZERO,
                fee_additional_item: Decimal::ZERO,
                fee_per_kg: Decimal::ZERO,
                fee_fixed: Decimal::ZERO,
                delivery_min_days: 7,
                delivery_max_days: 31,
                return_policy: "30 days".to_string(),
            },
            created_at: now,
            updated_at: now,
        };

        let draft = draft_from_store(&store);
        let input = validate_store_draft(&draft).unwrap();
        assert_eq!(input.name, store.name);
        assert_eq!(input.slug, store.slug);
        assert_eq!(input.shipping, store.shipping);
    }
}
