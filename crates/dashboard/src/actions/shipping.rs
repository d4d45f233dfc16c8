//! Shipping rate submission action.

use rust_decimal::Decimal;
use tracing::instrument;

use tangelo_core::StoreId;

use crate::db::{ShippingRateRepository, StoreRepository};
use crate::models::{CurrentUser, ShippingRate, ShippingRateInput, Store};
use crate::validate::FieldErrors;

use super::{ActionResult, persistence_failure};

/// Raw shipping rate form input for one country.
///
/// Blank policy fields inherit the store's default shipping policy.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ShippingRateForm {
    pub store_id: Option<StoreId>,
    pub country_code: String,
    pub country_name: String,
    pub shipping_service: Option<String>,
    pub fee_per_item: Option<Decimal>,
    pub fee_additional_item: Option<Decimal>,
    pub fee_per_kg: Option<Decimal>,
    pub fee_fixed: Option<Decimal>,
    pub delivery_min_days: Option<i32>,
    pub delivery_max_days: Option<i32>,
    pub return_policy: Option<String>,
}

fn validate(form: &ShippingRateForm, store: &Store) -> Result<ShippingRateInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let country_code = form.country_code.trim().to_uppercase();
    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push("country_code", "Country code must be two letters");
    }

    for (field, value) in [
        ("fee_per_item", form.fee_per_item),
        ("fee_additional_item", form.fee_additional_item),
        ("fee_per_kg", form.fee_per_kg),
        ("fee_fixed", form.fee_fixed),
    ] {
        if let Some(fee) = value
            && fee < Decimal::ZERO
        {
            errors.push(field, "Fee cannot be negative");
        }
    }

    let min = form.delivery_min_days.unwrap_or(store.shipping.delivery_min_days);
    let max = form.delivery_max_days.unwrap_or(store.shipping.delivery_max_days);
    if min < 1 {
        errors.push("delivery_min_days", "Minimum delivery time must be at least 1 day");
    }
    if min > max {
        errors.push(
            "delivery_max_days",
            "Maximum delivery time cannot be earlier than the minimum",
        );
    }

    errors.into_result()?;

    let defaults = &store.shipping;
    Ok(ShippingRateInput {
        store_id: store.id,
        country_code,
        country_name: form.country_name.trim().to_owned(),
        shipping_service: form
            .shipping_service
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults.shipping_service.clone()),
        fee_per_item: form.fee_per_item.unwrap_or(defaults.fee_per_item),
        fee_additional_item: form
            .fee_additional_item
            .unwrap_or(defaults.fee_additional_item),
        fee_per_kg: form.fee_per_kg.unwrap_or(defaults.fee_per_kg),
        fee_fixed: form.fee_fixed.unwrap_or(defaults.fee_fixed),
        delivery_min_days: min,
        delivery_max_days: max,
        return_policy: form
            .return_policy
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults.return_policy.clone()),
    })
}

/// Validate a per-country shipping rate and upsert it.
///
/// Saving the same (store, country) pair twice overwrites the previous
/// rate; there is no separate create/update distinction here.
#[instrument(skip(rates, stores, user, form), fields(country = %form.country_code))]
pub async fn upsert_shipping_rate<R: ShippingRateRepository, S: StoreRepository>(
    rates: &R,
    stores: &S,
    user: Option<&CurrentUser>,
    form: &ShippingRateForm,
) -> ActionResult<ShippingRate> {
    // 1. Authenticated
    let Some(user) = user else {
        return ActionResult::unauthorized();
    };
    // 2. Authorized
    if !user.role.can_sell() {
        return ActionResult::forbidden();
    }

    // 3. Required fields present
    let mut missing = Vec::new();
    if form.store_id.is_none() {
        missing.push("store_id");
    }
    if form.country_code.trim().is_empty() {
        missing.push("country_code");
    }
    if form.country_name.trim().is_empty() {
        missing.push("country_name");
    }
    if !missing.is_empty() {
        return ActionResult::missing_fields(&missing);
    }

    // The rate must belong to a store the caller owns.
    #[allow(clippy::unwrap_used)] // presence checked above
    let store_id = form.store_id.unwrap();
    let store = match stores.get(store_id).await {
        Ok(Some(store)) if store.owner_id == user.id => store,
        Ok(Some(_)) => return ActionResult::forbidden(),
        Ok(None) => return ActionResult::not_found("Store"),
        Err(e) => return persistence_failure("Store lookup failed", &e),
    };

    // 4. Schema validation (defaults inherited from the store)
    let input = match validate(form, &store) {
        Ok(input) => input,
        Err(errors) => return ActionResult::invalid(&errors),
    };

    // 5. No uniqueness precondition: the (store, country) key upserts
    match rates.upsert(&input).await {
        Ok(rate) => ActionResult::updated(rate, "Shipping rate saved"),
        Err(e) => persistence_failure("Shipping rate upsert failed", &e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tangelo_core::Role;

    use super::super::testing::{
        MemoryShippingRateRepository, MemoryStoreRepository, current_user, seeded_store,
    };
    use super::*;

    fn france_form(store_id: StoreId) -> ShippingRateForm {
        ShippingRateForm {
            store_id: Some(store_id),
            country_code: "fr".to_string(),
            country_name: "France".to_string(),
            fee_per_item: Some(Decimal::new(300, 2)),
            delivery_min_days: Some(4),
            delivery_max_days: Some(9),
            ..ShippingRateForm::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() {
        let stores = MemoryStoreRepository::default();
        let store = seeded_store(&stores, 1, "Acme", "acme");
        let rates = MemoryShippingRateRepository::default();
        let user = current_user(1, Role::Seller);

        let first = upsert_shipping_rate(&rates, &stores, Some(&user), &france_form(store.id)).await;
        assert_eq!(first.status_code, 200);
        let rate = first.data.unwrap();
        assert_eq!(rate.country_code, "FR");
        assert_eq!(rate.fee_per_item, Decimal::new(300, 2));

        let mut update = france_form(store.id);
        update.fee_per_item = Some(Decimal::new(450, 2));
        let second = upsert_shipping_rate(&rates, &stores, Some(&user), &update).await;
        assert_eq!(second.status_code, 200);
        assert_eq!(second.data.unwrap().fee_per_item, Decimal::new(450, 2));

        assert_eq!(rates.count(), 1);
    }

    #[tokio::test]
    async fn test_blank_fields_inherit_store_defaults() {
        let stores = MemoryStoreRepository::default();
        let store = seeded_store(&stores, 1, "Acme", "acme");
        let rates = MemoryShippingRateRepository::default();
        let user = current_user(1, Role::Seller);

        let form = ShippingRateForm {
            store_id: Some(store.id),
            country_code: "DE".to_string(),
            country_name: "Germany".to_string(),
            ..ShippingRateForm::default()
        };
        let result = upsert_shipping_rate(&rates, &stores, Some(&user), &form).await;
        let rate = result.data.unwrap();
        assert_eq!(rate.shipping_service, store.shipping.shipping_service);
        assert_eq!(rate.delivery_min_days, store.shipping.delivery_min_days);
        assert_eq!(rate.return_policy, store.shipping.return_policy);
    }

    #[tokio::test]
    async fn test_bad_country_code_rejected() {
        let stores = MemoryStoreRepository::default();
        let store = seeded_store(&stores, 1, "Acme", "acme");
        let rates = MemoryShippingRateRepository::default();
        let user = current_user(1, Role::Seller);

        let form = ShippingRateForm {
            country_code: "FRA".to_string(),
            ..france_form(store.id)
        };
        let result = upsert_shipping_rate(&rates, &stores, Some(&user), &form).await;
        assert_eq!(result.status_code, 400);
        assert!(result.message.contains("two letters"));
    }

    #[tokio::test]
    async fn test_foreign_store_forbidden() {
        let stores = MemoryStoreRepository::default();
        let store = seeded_store(&stores, 1, "Acme", "acme");
        let rates = MemoryShippingRateRepository::default();
        let intruder = current_user(2, Role::Seller);

        let result =
            upsert_shipping_rate(&rates, &stores, Some(&intruder), &france_form(store.id)).await;
        assert_eq!(result.status_code, 403);
    }
}
