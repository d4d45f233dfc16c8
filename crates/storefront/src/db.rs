//! Read-only catalog queries.
//!
//! The storefront renders the same catalog the dashboard writes, but only
//! ever reads it, and only ever sees active stores.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::instrument;

use tangelo_core::{CategoryId, Slug, VariantId};

use crate::models::{
    NavCategory, NavSubcategory, ProductCard, ProductPage, ProductPageSize, ProductPageVariant,
    StorePage,
};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Read-only catalog repository.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

const CARD_COLUMNS: &str = r"
    p.id, p.name, p.slug, p.brand, s.name AS store_name, s.slug AS store_slug,
    (
        SELECT vi.url
        FROM variants v
        JOIN variant_images vi ON vi.variant_id = v.id
        WHERE v.product_id = p.id
        ORDER BY v.id, vi.position
        LIMIT 1
    ) AS image_url,
    (
        SELECT MIN(vs.price)
        FROM variants v
        JOIN variant_sizes vs ON vs.variant_id = v.id
        WHERE v.product_id = p.id
    ) AS price_from
";

impl<'a> CatalogRepository<'a> {
    /// Create a new repository over the shared pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The category tree for the navbar.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a query fails.
    #[instrument(skip(self))]
    pub async fn category_tree(&self) -> Result<Vec<NavCategory>, sqlx::Error> {
        let categories: Vec<(CategoryId, String, Slug, bool)> = sqlx::query_as(
            "SELECT id, name, slug, featured FROM categories ORDER BY featured DESC, name",
        )
        .fetch_all(self.pool)
        .await?;

        let subcategories: Vec<NavSubcategory> = sqlx::query_as(
            "SELECT category_id, name, slug FROM subcategories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories
            .into_iter()
            .map(|(id, name, slug, featured)| NavCategory {
                subcategories: subcategories
                    .iter()
                    .filter(|s| s.category_id == id)
                    .cloned()
                    .collect(),
                id,
                name,
                slug,
                featured,
            })
            .collect())
    }

    /// Newest products from active stores for the home page.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    #[instrument(skip(self))]
    pub async fn latest_products(&self, limit: i64) -> Result<Vec<ProductCard>, sqlx::Error> {
        sqlx::query_as(&format!(
            r"
            SELECT {CARD_COLUMNS}
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE s.status = 'active'
            ORDER BY p.created_at DESC
            LIMIT $1
            "
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await
    }

    /// Case-insensitive product search over name, brand, and description.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ProductCard>, sqlx::Error> {
        let pattern = format!("%{}%", query.trim());
        sqlx::query_as(&format!(
            r"
            SELECT {CARD_COLUMNS}
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE s.status = 'active'
              AND (p.name ILIKE $1 OR p.brand ILIKE $1 OR p.description ILIKE $1)
            ORDER BY p.created_at DESC
            LIMIT $2
            "
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await
    }

    /// Products of one category (home page sections, category pages).
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    #[instrument(skip(self))]
    pub async fn products_in_category(
        &self,
        category_slug: &str,
        limit: i64,
    ) -> Result<Vec<ProductCard>, sqlx::Error> {
        sqlx::query_as(&format!(
            r"
            SELECT {CARD_COLUMNS}
            FROM products p
            JOIN stores s ON s.id = p.store_id
            JOIN categories c ON c.id = p.category_id
            WHERE s.status = 'active' AND c.slug = $1
            ORDER BY p.created_at DESC
            LIMIT $2
            "
        ))
        .bind(category_slug)
        .bind(limit)
        .fetch_all(self.pool)
        .await
    }

    /// Full product detail by slug; `None` when absent or the store is not
    /// active.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a query fails.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<ProductPage>, sqlx::Error> {
        type ProductRow = (
            tangelo_core::ProductId,
            String,
            Slug,
            String,
            String,
            String,
            Slug,
        );
        let header: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT p.id, p.name, p.slug, p.description, p.brand, s.name, s.slug
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE p.slug = $1 AND s.status = 'active'
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, name, product_slug, description, brand, store_name, store_slug)) = header
        else {
            return Ok(None);
        };

        let variant_rows: Vec<(VariantId, String, Slug, Vec<String>)> = sqlx::query_as(
            "SELECT id, name, slug, colors FROM variants WHERE product_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        let mut variants = Vec::with_capacity(variant_rows.len());
        for (variant_id, variant_name, variant_slug, colors) in variant_rows {
            let images: Vec<(String,)> = sqlx::query_as(
                "SELECT url FROM variant_images WHERE variant_id = $1 ORDER BY position",
            )
            .bind(variant_id)
            .fetch_all(self.pool)
            .await?;

            let sizes: Vec<ProductPageSize> = sqlx::query_as(
                "SELECT label, quantity, price, discount FROM variant_sizes WHERE variant_id = $1 ORDER BY id",
            )
            .bind(variant_id)
            .fetch_all(self.pool)
            .await?;

            let specs: Vec<(String, String)> = sqlx::query_as(
                "SELECT name, value FROM variant_specs WHERE variant_id = $1 ORDER BY id",
            )
            .bind(variant_id)
            .fetch_all(self.pool)
            .await?;

            variants.push(ProductPageVariant {
                name: variant_name,
                slug: variant_slug,
                colors,
                images: images.into_iter().map(|(url,)| url).collect(),
                sizes,
                specs,
            });
        }

        Ok(Some(ProductPage {
            id,
            name,
            slug: product_slug,
            description,
            brand,
            store_name,
            store_slug,
            variants,
        }))
    }

    /// A store header by slug, active stores only.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    #[instrument(skip(self))]
    pub async fn store_by_slug(&self, slug: &str) -> Result<Option<StorePage>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT name, slug, description, logo_url, cover_url
            FROM stores
            WHERE slug = $1 AND status = 'active'
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await
    }

    /// Product cards for one store's page.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the query fails.
    #[instrument(skip(self))]
    pub async fn products_for_store(
        &self,
        store_slug: &str,
        limit: i64,
    ) -> Result<Vec<ProductCard>, sqlx::Error> {
        sqlx::query_as(&format!(
            r"
            SELECT {CARD_COLUMNS}
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE s.status = 'active' AND s.slug = $1
            ORDER BY p.created_at DESC
            LIMIT $2
            "
        ))
        .bind(store_slug)
        .bind(limit)
        .fetch_all(self.pool)
        .await
    }
}
