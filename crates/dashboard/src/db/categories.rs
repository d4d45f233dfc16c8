//! Category repository.

use std::future::Future;

use sqlx::PgPool;
use tracing::{debug, instrument};

use tangelo_core::{CategoryId, Slug};

use super::{ConflictField, RepositoryError};
use crate::models::{Category, CategoryInput};

/// Persistence interface for categories.
///
/// Uses RPITIT (return position `impl Trait` in traits) so submission
/// actions stay generic over the backing store.
pub trait CategoryRepository: Send + Sync {
    /// List all categories, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, RepositoryError>> + Send;

    /// Get a category by id.
    fn get(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<Option<Category>, RepositoryError>> + Send;

    /// Find a unique-field clash against an existing category.
    ///
    /// `exclude` skips the record's own row on update. Name matches are
    /// reported ahead of slug matches.
    fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        exclude: Option<CategoryId>,
    ) -> impl Future<Output = Result<Option<ConflictField>, RepositoryError>> + Send;

    /// Insert a new category.
    fn insert(
        &self,
        input: &CategoryInput,
    ) -> impl Future<Output = Result<Category, RepositoryError>> + Send;

    /// Update an existing category.
    fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> impl Future<Output = Result<Category, RepositoryError>> + Send;

    /// Delete a category (cascades to its subcategories).
    fn delete(&self, id: CategoryId)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`CategoryRepository`].
pub struct PgCategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgCategoryRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for PgCategoryRepository<'_> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<Category> = sqlx::query_as(
            r"
            SELECT id, name, slug, image_url, image_public_id, featured, created_at, updated_at
            FROM categories
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row: Option<Category> = sqlx::query_as(
            r"
            SELECT id, name, slug, image_url, image_public_id, featured, created_at, updated_at
            FROM categories
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    async fn find_conflict(
        &self,
        name: &str,
        slug: &Slug,
        exclude: Option<CategoryId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let row: Option<(String, Slug)> = sqlx::query_as(
            r"
            SELECT name, slug
            FROM categories
            WHERE (lower(name) = lower($1) OR slug = $2)
              AND ($3::int4 IS NULL OR id <> $3)
            LIMIT 1
            ",
        )
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

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn insert(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row: Category = sqlx::query_as(
            r"
            INSERT INTO categories (name, slug, image_url, image_public_id, featured)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, image_url, image_public_id, featured, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.image_url)
        .bind(&input.image_public_id)
        .bind(input.featured)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "category name or slug already exists"))?;

        debug!(id = %row.id, "Inserted category");
        Ok(row)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row: Option<Category> = sqlx::query_as(
            r"
            UPDATE categories
            SET name = $2, slug = $3, image_url = $4, image_public_id = $5,
                featured = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, image_url, image_public_id, featured, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.image_url)
        .bind(&input.image_public_id)
        .bind(input.featured)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "category name or slug already exists"))?;

        row.ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
