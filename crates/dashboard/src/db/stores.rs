//! Store repository.

use std::future::Future;

use sqlx::PgPool;
use tracing::{debug, instrument};

use tangelo_core::{Email, Phone, Slug, StoreId, StoreStatus, UserId};

use super::{ConflictField, RepositoryError};
use crate::models::{Store, StoreInput};

/// Persistence interface for seller stores.
pub trait StoreRepository: Send + Sync {
    /// Get a store by id.
    fn get(
        &self,
        id: StoreId,
    ) -> impl Future<Output = Result<Option<Store>, RepositoryError>> + Send;

    /// Get a store by slug.
    fn get_by_slug(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<Store>, RepositoryError>> + Send;

    /// List the stores owned by a user, newest first.
    fn list_for_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Vec<Store>, RepositoryError>> + Send;

    /// Find a unique-field clash against an existing store.
    ///
    /// Checks name, slug, email, and phone in that order; `exclude` skips
    /// the record's own row on update.
    fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        email: &Email,
        phone: &Phone,
        exclude: Option<StoreId>,
    ) -> impl Future<Output = Result<Option<ConflictField>, RepositoryError>> + Send;

    /// Insert a new store owned by `owner_id`, in `Pending` status.
    fn insert(
        &self,
        owner_id: UserId,
        input: &StoreInput,
    ) -> impl Future<Output = Result<Store, RepositoryError>> + Send;

    /// Update an existing store's editable fields.
    fn update(
        &self,
        id: StoreId,
        input: &StoreInput,
    ) -> impl Future<Output = Result<Store, RepositoryError>> + Send;

    /// Set a store's lifecycle status (admin operation).
    fn set_status(
        &self,
        id: StoreId,
        status: StoreStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`StoreRepository`].
pub struct PgStoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgStoreRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, owner_id, name, slug, description, email, phone, \
    logo_url, logo_public_id, cover_url, cover_public_id, status, featured, \
    shipping_service, fee_per_item, fee_additional_item, fee_per_kg, fee_fixed, \
    delivery_min_days, delivery_max_days, return_policy, created_at, updated_at";

impl StoreRepository for PgStoreRepository<'_> {
    async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<Store> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM stores WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row)
    }

    async fn get_by_slug(&self, slug: &Slug) -> Result<Option<Store>, RepositoryError> {
        let row: Option<Store> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM stores WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;

        Ok(row)
    }

    #[instrument(skip(self))]
    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<Store> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM stores WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        email: &Email,
        phone: &Phone,
        exclude: Option<StoreId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let row: Option<(String, Slug, Email, Phone)> = sqlx::query_as(
            r"
            SELECT name, slug, email, phone
            FROM stores
            WHERE (lower(name) = lower($1) OR slug = $2 OR lower(email) = lower($3) OR phone = $4)
              AND ($5::int4 IS NULL OR id <> $5)
            LIMIT 1
            ",
        )
        .bind(name)
        .bind(slug)
        .bind(email)
        .bind(phone)
        .bind(exclude)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(existing_name, existing_slug, existing_email, _)| {
            if existing_name.eq_ignore_ascii_case(name) {
                ConflictField::Name
            } else if existing_slug == *slug {
                ConflictField::Slug
            } else if existing_email.as_str().eq_ignore_ascii_case(email.as_str()) {
                ConflictField::Email
            } else {
                ConflictField::Phone
            }
        }))
    }

    #[instrument(skip(self, input), fields(name = %input.name, owner = %owner_id))]
    async fn insert(&self, owner_id: UserId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let row: Store = sqlx::query_as(&format!(
            r"
            INSERT INTO stores (
                owner_id, name, slug, description, email, phone,
                logo_url, logo_public_id, cover_url, cover_public_id,
                shipping_service, fee_per_item, fee_additional_item, fee_per_kg,
                fee_fixed, delivery_min_days, delivery_max_days, return_policy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {COLUMNS}
            "
        ))
        .bind(owner_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.logo_url)
        .bind(&input.logo_public_id)
        .bind(&input.cover_url)
        .bind(&input.cover_public_id)
        .bind(&input.shipping.shipping_service)
        .bind(input.shipping.fee_per_item)
        .bind(input.shipping.fee_additional_item)
        .bind(input.shipping.fee_per_kg)
        .bind(input.shipping.fee_fixed)
        .bind(input.shipping.delivery_min_days)
        .bind(input.shipping.delivery_max_days)
        .bind(&input.shipping.return_policy)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "store name, slug, email, or phone already exists")
        })?;

        debug!(id = %row.id, "Inserted store");
        Ok(row)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn update(&self, id: StoreId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let row: Option<Store> = sqlx::query_as(&format!(
            r"
            UPDATE stores
            SET name = $2, slug = $3, description = $4, email = $5, phone = $6,
                logo_url = $7, logo_public_id = $8, cover_url = $9, cover_public_id = $10,
                shipping_service = $11, fee_per_item = $12, fee_additional_item = $13,
                fee_per_kg = $14, fee_fixed = $15, delivery_min_days = $16,
                delivery_max_days = $17, return_policy = $18, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.logo_url)
        .bind(&input.logo_public_id)
        .bind(&input.cover_url)
        .bind(&input.cover_public_id)
        .bind(&input.shipping.shipping_service)
        .bind(input.shipping.fee_per_item)
        .bind(input.shipping.fee_additional_item)
        .bind(input.shipping.fee_per_kg)
        .bind(input.shipping.fee_fixed)
        .bind(input.shipping.delivery_min_days)
        .bind(input.shipping.delivery_max_days)
        .bind(&input.shipping.return_policy)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "store name, slug, email, or phone already exists")
        })?;

        row.ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: StoreId, status: StoreStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE stores SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
