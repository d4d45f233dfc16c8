//! Shipping rate repository.

use std::future::Future;

use sqlx::PgPool;
use tracing::{debug, instrument};

use tangelo_core::StoreId;

use super::RepositoryError;
use crate::models::{ShippingRate, ShippingRateInput};

/// Persistence interface for per-country shipping rates.
pub trait ShippingRateRepository: Send + Sync {
    /// List a store's shipping rates ordered by country name.
    fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<Vec<ShippingRate>, RepositoryError>> + Send;

    /// Get the rate for one (store, country) pair.
    fn get(
        &self,
        store_id: StoreId,
        country_code: &str,
    ) -> impl Future<Output = Result<Option<ShippingRate>, RepositoryError>> + Send;

    /// Insert or update the rate for the input's (store, country) pair.
    fn upsert(
        &self,
        input: &ShippingRateInput,
    ) -> impl Future<Output = Result<ShippingRate, RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`ShippingRateRepository`].
pub struct PgShippingRateRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgShippingRateRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, store_id, country_code, country_name, shipping_service, \
    fee_per_item, fee_additional_item, fee_per_kg, fee_fixed, \
    delivery_min_days, delivery_max_days, return_policy, created_at, updated_at";

impl ShippingRateRepository for PgShippingRateRepository<'_> {
    #[instrument(skip(self))]
    async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<ShippingRate>, RepositoryError> {
        let rows: Vec<ShippingRate> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shipping_rates WHERE store_id = $1 ORDER BY country_name"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(
        &self,
        store_id: StoreId,
        country_code: &str,
    ) -> Result<Option<ShippingRate>, RepositoryError> {
        let row: Option<ShippingRate> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM shipping_rates WHERE store_id = $1 AND country_code = $2"
        ))
        .bind(store_id)
        .bind(country_code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    #[instrument(skip(self, input), fields(store = %input.store_id, country = %input.country_code))]
    async fn upsert(&self, input: &ShippingRateInput) -> Result<ShippingRate, RepositoryError> {
        let row: ShippingRate = sqlx::query_as(&format!(
            r"
            INSERT INTO shipping_rates (
                store_id, country_code, country_name, shipping_service,
                fee_per_item, fee_additional_item, fee_per_kg, fee_fixed,
                delivery_min_days, delivery_max_days, return_policy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (store_id, country_code) DO UPDATE SET
                country_name = EXCLUDED.country_name,
                shipping_service = EXCLUDED.shipping_service,
                fee_per_item = EXCLUDED.fee_per_item,
                fee_additional_item = EXCLUDED.fee_additional_item,
                fee_per_kg = EXCLUDED.fee_per_kg,
                fee_fixed = EXCLUDED.fee_fixed,
                delivery_min_days = EXCLUDED.delivery_min_days,
                delivery_max_days = EXCLUDED.delivery_max_days,
                return_policy = EXCLUDED.return_policy,
                updated_at = NOW()
            RETURNING {COLUMNS}
            "
        ))
        .bind(input.store_id)
        .bind(&input.country_code)
        .bind(&input.country_name)
        .bind(&input.shipping_service)
        .bind(input.fee_per_item)
        .bind(input.fee_additional_item)
        .bind(input.fee_per_kg)
        .bind(input.fee_fixed)
        .bind(input.delivery_min_days)
        .bind(input.delivery_max_days)
        .bind(&input.return_policy)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %row.id, "Upserted shipping rate");
        Ok(row)
    }
}
