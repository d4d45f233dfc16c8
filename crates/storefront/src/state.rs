//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::CatalogRepository;
use crate::models::NavCategory;

/// How long the navbar category tree may be served from cache.
const NAV_CACHE_TTL: Duration = Duration::from_secs(300);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    nav_cache: Cache<&'static str, Arc<Vec<NavCategory>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let nav_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(NAV_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                nav_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The navbar category tree, cached for a few minutes.
    ///
    /// Falls back to an empty tree when the database is unreachable; the
    /// navbar degrades instead of failing the whole page.
    pub async fn category_tree(&self) -> Arc<Vec<NavCategory>> {
        self.inner
            .nav_cache
            .get_with("tree", async {
                let repo = CatalogRepository::new(&self.inner.pool);
                match repo.category_tree().await {
                    Ok(tree) => Arc::new(tree),
                    Err(e) => {
                        tracing::error!("Failed to load category tree: {e}");
                        Arc::new(vec![])
                    }
                }
            })
            .await
    }
}
