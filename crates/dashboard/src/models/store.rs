//! Seller store model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tangelo_core::{Email, Phone, Slug, StoreId, StoreStatus, UserId};

/// Default shipping policy applied when a store has no country-specific
/// shipping rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ShippingDefaults {
    /// Carrier/service name shown to buyers (e.g., "Standard International").
    pub shipping_service: String,
    /// Fee for the first item of a product.
    pub fee_per_item: Decimal,
    /// Fee for each additional item of the same product.
    pub fee_additional_item: Decimal,
    /// Fee per kilogram for weight-priced products.
    pub fee_per_kg: Decimal,
    /// Flat fee applied to the whole shipment.
    pub fee_fixed: Decimal,
    /// Earliest delivery estimate in days.
    pub delivery_min_days: i32,
    /// Latest delivery estimate in days.
    pub delivery_max_days: i32,
    /// Free-form return policy text.
    pub return_policy: String,
}

/// A seller's store.
///
/// Name, slug, email, and phone are unique across all stores.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    pub owner_id: UserId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub email: Email,
    pub phone: Phone,
    pub logo_url: String,
    pub logo_public_id: String,
    pub cover_url: String,
    pub cover_public_id: String,
    pub status: StoreStatus,
    pub featured: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub shipping: ShippingDefaults,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully-validated input for creating or updating a store.
///
/// Produced from a complete `StoreDraft` by `validate::validate_store_draft`;
/// the submission action never persists anything that didn't pass through
/// that conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub email: Email,
    pub phone: Phone,
    pub logo_url: String,
    pub logo_public_id: String,
    pub cover_url: String,
    pub cover_public_id: String,
    pub shipping: ShippingDefaults,
}
