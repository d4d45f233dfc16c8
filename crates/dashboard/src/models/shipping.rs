//! Country-specific shipping rate model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tangelo_core::{ShippingRateId, StoreId};

/// A store's shipping rate for one destination country.
///
/// Overrides the store's [`super::ShippingDefaults`] for that country; at
/// most one rate exists per (store, country) pair and saving again upserts.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ShippingRate {
    pub id: ShippingRateId,
    pub store_id: StoreId,
    /// ISO 3166-1 alpha-2 country code (uppercase).
    pub country_code: String,
    pub country_name: String,
    pub shipping_service: String,
    pub fee_per_item: Decimal,
    pub fee_additional_item: Decimal,
    pub fee_per_kg: Decimal,
    pub fee_fixed: Decimal,
    pub delivery_min_days: i32,
    pub delivery_max_days: i32,
    pub return_policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for upserting a shipping rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingRateInput {
    pub store_id: StoreId,
    pub country_code: String,
    pub country_name: String,
    pub shipping_service: String,
    pub fee_per_item: Decimal,
    pub fee_additional_item: Decimal,
    pub fee_per_kg: Decimal,
    pub fee_fixed: Decimal,
    pub delivery_min_days: i32,
    pub delivery_max_days: i32,
    pub return_policy: String,
}
