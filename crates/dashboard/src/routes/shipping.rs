//! Shipping rate route handlers (seller).

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::actions::{ShippingRateForm, upsert_shipping_rate};
use crate::db::{PgShippingRateRepository, PgStoreRepository, ShippingRateRepository};
use crate::filters;
use crate::middleware::RequireSeller;
use crate::models::{ShippingRate, Store};
use crate::state::AppState;
use crate::validate::FieldErrors;

use super::render;
use super::stores::owned_store;

/// Shipping rates page template.
#[derive(Template)]
#[template(path = "shipping/index.html")]
pub struct ShippingIndexTemplate {
    pub store: Store,
    pub rates: Vec<ShippingRate>,
    pub error: Option<String>,
}

/// Raw per-country rate form; numeric fields as strings so blanks
/// inherit the store defaults instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct RateForm {
    pub country_code: String,
    pub country_name: String,
    pub shipping_service: Option<String>,
    pub fee_per_item: Option<String>,
    pub fee_additional_item: Option<String>,
    pub fee_per_kg: Option<String>,
    pub fee_fixed: Option<String>,
    pub delivery_min_days: Option<String>,
    pub delivery_max_days: Option<String>,
    pub return_policy: Option<String>,
}

fn parse_optional<T: std::str::FromStr>(
    field: &'static str,
    raw: Option<&str>,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, message.to_owned());
            None
        }
    }
}

impl RateForm {
    fn into_action_form(self, store: &Store) -> Result<ShippingRateForm, FieldErrors> {
        let mut errors = FieldErrors::new();
        let form = ShippingRateForm {
            store_id: Some(store.id),
            country_code: self.country_code,
            country_name: self.country_name,
            shipping_service: self.shipping_service.filter(|s| !s.trim().is_empty()),
            fee_per_item: parse_optional::<Decimal>(
                "fee_per_item",
                self.fee_per_item.as_deref(),
                "Enter a valid amount",
                &mut errors,
            ),
            fee_additional_item: parse_optional::<Decimal>(
                "fee_additional_item",
                self.fee_additional_item.as_deref(),
                "Enter a valid amount",
                &mut errors,
            ),
            fee_per_kg: parse_optional::<Decimal>(
                "fee_per_kg",
                self.fee_per_kg.as_deref(),
                "Enter a valid amount",
                &mut errors,
            ),
            fee_fixed: parse_optional::<Decimal>(
                "fee_fixed",
                self.fee_fixed.as_deref(),
                "Enter a valid amount",
                &mut errors,
            ),
            delivery_min_days: parse_optional::<i32>(
                "delivery_min_days",
                self.delivery_min_days.as_deref(),
                "Enter a whole number of days",
                &mut errors,
            ),
            delivery_max_days: parse_optional::<i32>(
                "delivery_max_days",
                self.delivery_max_days.as_deref(),
                "Enter a whole number of days",
                &mut errors,
            ),
            return_policy: self.return_policy.filter(|s| !s.trim().is_empty()),
        };
        errors.into_result()?;
        Ok(form)
    }
}

/// Shipping rates page handler.
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

    let repo = PgShippingRateRepository::new(state.pool());
    let rates = match repo.list_for_store(store.id).await {
        Ok(rates) => rates,
        Err(e) => {
            tracing::error!("Failed to list shipping rates: {e}");
            vec![]
        }
    };

    render(&ShippingIndexTemplate {
        store,
        rates,
        error: None,
    })
    .into_response()
}

/// Upsert one country's shipping rate.
#[instrument(skip(seller, state, form), fields(country = %form.country_code))]
pub async fn upsert(
    RequireSeller(seller): RequireSeller,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<RateForm>,
) -> impl IntoResponse {
    let store = match owned_store(&state, &seller, &slug).await {
        Ok(store) => store,
        Err(response) => return response,
    };

    let rates = PgShippingRateRepository::new(state.pool());
    let stores = PgStoreRepository::new(state.pool());

    let action_form = match form.into_action_form(&store) {
        Ok(action_form) => action_form,
        Err(errors) => {
            let existing = rates.list_for_store(store.id).await.unwrap_or_default();
            return (
                StatusCode::BAD_REQUEST,
                render(&ShippingIndexTemplate {
                    store,
                    rates: existing,
                    error: Some(errors.to_string()),
                }),
            )
                .into_response();
        }
    };

    let result = upsert_shipping_rate(&rates, &stores, Some(&seller), &action_form).await;

    if result.success {
        tracing::info!(store_id = %store.id, "Shipping rate saved");
        Redirect::to(&format!("/dashboard/seller/stores/{slug}/shipping")).into_response()
    } else {
        let existing = rates.list_for_store(store.id).await.unwrap_or_default();
        (
            StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::BAD_REQUEST),
            render(&ShippingIndexTemplate {
                store,
                rates: existing,
                error: Some(result.message),
            }),
        )
            .into_response()
    }
}
