//! Database operations for the `tangelo` `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Dashboard accounts (role-gated: user / seller / admin)
//! - `sessions` - tower-sessions storage
//! - `categories` / `subcategories` - The category tree
//! - `stores` - Seller stores with default shipping policy
//! - `products` / `variants` / `variant_images` / `variant_sizes` /
//!   `variant_specs` - Product aggregates
//! - `shipping_rates` - Per-country overrides of a store's shipping policy
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p tangelo-cli -- migrate
//! ```
//!
//! Each entity exposes a repository trait consumed by the submission
//! actions, with the `Pg*` struct as the production implementation. Traits
//! keep the actions runnable against in-memory stores in unit tests.

pub mod categories;
pub mod products;
pub mod shipping;
pub mod stores;
pub mod subcategories;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::{CategoryRepository, PgCategoryRepository};
pub use products::{PgProductRepository, ProductRepository};
pub use shipping::{PgShippingRateRepository, ShippingRateRepository};
pub use stores::{PgStoreRepository, StoreRepository};
pub use subcategories::{PgSubcategoryRepository, SubcategoryRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`Self::Conflict`].
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// A unique field that clashed with an existing record.
///
/// Returned by the repositories' `find_conflict` queries so submission
/// actions can name exactly which field blocked the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Name,
    Slug,
    Email,
    Phone,
}

impl ConflictField {
    /// The field name as it appears in user-facing conflict messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Slug => "slug",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
