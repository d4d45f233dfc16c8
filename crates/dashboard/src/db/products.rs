//! Product aggregate repository.
//!
//! A product row and its variant rows (plus each variant's images, sizes,
//! and specs) are written in a single transaction; readers always see a
//! complete aggregate or none of it.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use tangelo_core::{ProductId, Slug, StoreId, VariantId};

use super::{ConflictField, RepositoryError};
use crate::models::{Product, ProductInput, Variant, VariantImage, VariantSize, VariantSpec};

/// Persistence interface for product aggregates.
pub trait ProductRepository: Send + Sync {
    /// Get a product with all its variants.
    fn get(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    /// List the products of one store, newest first.
    fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Find a product slug clash, excluding the record's own row on update.
    fn find_conflict(
        &self,
        slug: &Slug,
        exclude: Option<ProductId>,
    ) -> impl Future<Output = Result<Option<ConflictField>, RepositoryError>> + Send;

    /// Insert a new product aggregate.
    fn insert(
        &self,
        input: &ProductInput,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Replace an existing product aggregate (variants are rewritten).
    fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Delete a product and its variants.
    fn delete(&self, id: ProductId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// `PostgreSQL` implementation of [`ProductRepository`].
pub struct PgProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PgProductRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the variants of a set of products.
    async fn load_variants(&self, product_id: ProductId) -> Result<Vec<Variant>, RepositoryError> {
        let rows: Vec<(VariantId, String, Slug, String, Vec<String>, Vec<String>)> =
            sqlx::query_as(
                r"
                SELECT id, name, slug, sku, keywords, colors
                FROM variants
                WHERE product_id = $1
                ORDER BY id
                ",
            )
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;

        let mut variants = Vec::with_capacity(rows.len());
        for (id, name, slug, sku, keywords, colors) in rows {
            let images: Vec<VariantImage> = sqlx::query_as(
                "SELECT url, public_id, position FROM variant_images WHERE variant_id = $1 ORDER BY position",
            )
            .bind(id)
            .fetch_all(self.pool)
            .await?;

            let sizes: Vec<VariantSize> = sqlx::query_as(
                "SELECT label, quantity, price, discount FROM variant_sizes WHERE variant_id = $1 ORDER BY id",
            )
            .bind(id)
            .fetch_all(self.pool)
            .await?;

            let specs: Vec<VariantSpec> = sqlx::query_as(
                "SELECT name, value FROM variant_specs WHERE variant_id = $1 ORDER BY id",
            )
            .bind(id)
            .fetch_all(self.pool)
            .await?;

            variants.push(Variant {
                id,
                name,
                slug,
                sku,
                keywords,
                colors,
                images,
                sizes,
                specs,
            });
        }

        Ok(variants)
    }

    /// Assemble a full product from its header row.
    async fn assemble(&self, header: ProductHeader) -> Result<Product, RepositoryError> {
        let variants = self.load_variants(header.id).await?;
        Ok(header.into_product(variants))
    }
}

/// The `products` table row, without variants.
#[derive(Debug, sqlx::FromRow)]
struct ProductHeader {
    id: ProductId,
    store_id: StoreId,
    name: String,
    slug: Slug,
    description: String,
    brand: String,
    category_id: tangelo_core::CategoryId,
    subcategory_id: tangelo_core::SubcategoryId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductHeader {
    fn into_product(self, variants: Vec<Variant>) -> Product {
        Product {
            id: self.id,
            store_id: self.store_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            brand: self.brand,
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const HEADER_COLUMNS: &str = "id, store_id, name, slug, description, brand, \
    category_id, subcategory_id, created_at, updated_at";

/// Write the variant child rows for a product inside an open transaction.
async fn insert_variants(
    conn: &mut PgConnection,
    product_id: ProductId,
    input: &ProductInput,
) -> Result<(), RepositoryError> {
    for variant in &input.variants {
        let (variant_id,): (VariantId,) = sqlx::query_as(
            r"
            INSERT INTO variants (product_id, name, slug, sku, keywords, colors)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(product_id)
        .bind(&variant.name)
        .bind(&variant.slug)
        .bind(&variant.sku)
        .bind(&variant.keywords)
        .bind(&variant.colors)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "variant slug already exists in product"))?;

        for image in &variant.images {
            sqlx::query(
                "INSERT INTO variant_images (variant_id, url, public_id, position) VALUES ($1, $2, $3, $4)",
            )
            .bind(variant_id)
            .bind(&image.url)
            .bind(&image.public_id)
            .bind(image.position)
            .execute(&mut *conn)
            .await?;
        }

        for size in &variant.sizes {
            sqlx::query(
                "INSERT INTO variant_sizes (variant_id, label, quantity, price, discount) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(variant_id)
            .bind(&size.label)
            .bind(size.quantity)
            .bind(size.price)
            .bind(size.discount)
            .execute(&mut *conn)
            .await?;
        }

        for spec in &variant.specs {
            sqlx::query("INSERT INTO variant_specs (variant_id, name, value) VALUES ($1, $2, $3)")
                .bind(variant_id)
                .bind(&spec.name)
                .bind(&spec.value)
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(())
}

impl ProductRepository for PgProductRepository<'_> {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let header: Option<ProductHeader> =
            sqlx::query_as(&format!("SELECT {HEADER_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match header {
            Some(h) => Ok(Some(self.assemble(h).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_for_store(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let headers: Vec<ProductHeader> = sqlx::query_as(&format!(
            "SELECT {HEADER_COLUMNS} FROM products WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        let mut products = Vec::with_capacity(headers.len());
        for header in headers {
            products.push(self.assemble(header).await?);
        }
        Ok(products)
    }

    async fn find_conflict(
        &self,
        slug: &Slug,
        exclude: Option<ProductId>,
    ) -> Result<Option<ConflictField>, RepositoryError> {
        let row: Option<(ProductId,)> = sqlx::query_as(
            r"
            SELECT id FROM products
            WHERE slug = $1 AND ($2::int4 IS NULL OR id <> $2)
            LIMIT 1
            ",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|_| ConflictField::Slug))
    }

    #[instrument(skip(self, input), fields(name = %input.name, store = %input.store_id))]
    async fn insert(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let header: ProductHeader = sqlx::query_as(&format!(
            r"
            INSERT INTO products (store_id, name, slug, description, brand, category_id, subcategory_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {HEADER_COLUMNS}
            "
        ))
        .bind(input.store_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.brand)
        .bind(input.category_id)
        .bind(input.subcategory_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "product slug already exists"))?;

        insert_variants(&mut tx, header.id, input).await?;
        tx.commit().await?;

        debug!(id = %header.id, "Inserted product");
        self.assemble(header).await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn update(&self, id: ProductId, input: &ProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let header: Option<ProductHeader> = sqlx::query_as(&format!(
            r"
            UPDATE products
            SET name = $2, slug = $3, description = $4, brand = $5,
                category_id = $6, subcategory_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {HEADER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.brand)
        .bind(input.category_id)
        .bind(input.subcategory_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "product slug already exists"))?;

        let Some(header) = header else {
            return Err(RepositoryError::NotFound);
        };

        // Variants are replaced wholesale; child tables cascade.
        sqlx::query("DELETE FROM variants WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_variants(&mut tx, id, input).await?;
        tx.commit().await?;

        self.assemble(header).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
