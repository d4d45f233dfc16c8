//! Subcategory repository.

use std::future::Future;

use sqlx::PgPool;
use tracing::{debug, instrument};

use tangelo_core::{CategoryId, Slug, SubcategoryId};

use super::{ConflictField, RepositoryError};
use crate::models::{Subcategory, SubcategoryInput};

/// Persistence interface for subcategories.
///
/// Uniqueness of name and slug is scoped to the parent category.
pub trait SubcategoryRepository: Send + Sync {
    /// List all subcategories, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Subcategory>, RepositoryError>> + Send;

    /// List the subcategories of one category.
    fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> impl Future<Output = Result<Vec<Subcategory>, RepositoryError>> + Send;

    /// Get a subcategory by id.
    fn get(
        &self,
        id: SubcategoryId,
    ) -> impl Future<Output = Result<Option<Subcategory>, RepositoryError>> + Send;

    /// Find a unique-field clash within the parent category.
    fn find_conflict(
        &self,
        category_id: CategoryId,
        name: &str,
        slug: &Slug,
        exclude: Option<SubcategoryId>,
    ) -> impl Future<Output = Result<Option<ConflictField>, RepositoryError>> + Send;

    /// Insert a new subcategory.
    fn insert(
        &self,
        input: &SubcategoryInput,
    ) -> impl Future<Output = Result<Subcategory, RepositoryError>> + Send;

    /// Update an existing subcategory.
    fn update(
        &self,
        id: SubcategoryId,
        input: &SubcategoryInput,
    ) -> impl Future<Output = Result<Subcategory, RepositoryError>> + Send;

    /// Delete a subcategory.
    fn delete(
        &self,
        id: SubcategoryId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`SubcategoryRepository`].
pub struct PgSubcategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgSubcategoryRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str =
    "id, category_id, name, slug, image_url, image_public_id, featured, created_at, updated_at";

impl SubcategoryRepository for PgSubcategoryRepository<'_> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows: Vec<Subcategory> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM subcategories ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows: Vec<Subcategory> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM subcategories WHERE category_id = $1 ORDER BY name"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: SubcategoryId) -> Result<Option<Subcategory>, RepositoryError> {
        let row: Option<Subcategory> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM subcategories WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row)
    }

    async fn find_conflict(
        &self,
        category_id: CategoryId,
        name: &str,
        slug: &Slug,
        exclude: Option<SubcategoryId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let row: Option<(String, Slug)> = sqlx::query_as(
            r"
            SELECT name, slug
            FROM subcategories
            WHERE category_id = $1
              AND (lower(name) = lower($2) OR slug = $3)
              AND ($4::int4 IS NULL OR id <> $4)
            LIMIT 1
            ",
        )
        .bind(category_id)
        .bind(name)
        .bind(slug)
        .bind(exclude)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(existing_name, _)| {
            if existing_name.eq_ignore_ascii_case(name) {
                ConflictField::Name
            } else {
                ConflictField::Slug
            }
        }))
    }

    #[instrument(skip(self, input), fields(name = %input.name, category = %input.category_id))]
    async fn insert(&self, input: &SubcategoryInput) -> Result<Subcategory, RepositoryError> {
        let row: Subcategory = sqlx::query_as(&format!(
            r"
            INSERT INTO subcategories (category_id, name, slug, image_url, image_public_id, featured)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "
        ))
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.image_url)
        .bind(&input.image_public_id)
        .bind(input.featured)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "subcategory name or slug already exists in category")
        })?;

        debug!(id = %row.id, "Inserted subcategory");
        Ok(row)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn update(
        &self,
        id: SubcategoryId,
        input: &SubcategoryInput,
    ) -> Result<Subcategory, RepositoryError> {
        let row: Option<Subcategory> = sqlx::query_as(&format!(
            r"
            UPDATE subcategories
            SET category_id = $2, name = $3, slug = $4, image_url = $5,
                image_public_id = $6, featured = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.image_url)
        .bind(&input.image_public_id)
        .bind(input.featured)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(e, "subcategory name or slug already exists in category")
        })?;

        row.ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: SubcategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
