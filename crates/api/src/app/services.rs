use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use gfc_catalog::{Category, Product, ProductQuery};
use gfc_store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StoreError};

/// Cap on the featured-products strip.
pub const FEATURED_LIMIT: u32 = 6;

/// Cap per category on the grouped-by-category view.
pub const BY_CATEGORY_LIMIT: u32 = 3;

/// Cap on the related-products strip.
pub const RELATED_LIMIT: u32 = 4;

/// Service wiring shared by all request handlers.
///
/// Holds the storage backend and composes the derived catalog views
/// (featured / by-category / related) over it.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn with_store(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Dev/test wiring over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryCatalogStore::new()))
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Active featured products in default order, capped at 6.
    pub async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        let query = ProductQuery {
            is_featured: Some(true),
            page_size: FEATURED_LIMIT,
            ..ProductQuery::default()
        };
        self.store.list_products(&query).await
    }

    /// Up to 3 active products per category, in catalog order.
    ///
    /// Categories with no active products are omitted entirely.
    pub async fn products_by_category(&self) -> Result<Vec<(Category, Vec<Product>)>, StoreError> {
        let mut groups = Vec::new();
        for category in Category::ALL {
            let query = ProductQuery {
                category: Some(category),
                page_size: BY_CATEGORY_LIMIT,
                ..ProductQuery::default()
            };
            let items = self.store.list_products(&query).await?;
            if !items.is_empty() {
                groups.push((category, items));
            }
        }
        Ok(groups)
    }

    /// Up to 4 other active products sharing the seed product's
    /// category. `None` when the seed does not resolve to an active
    /// product.
    pub async fn related_products(&self, id: i64) -> Result<Option<Vec<Product>>, StoreError> {
        let Some(seed) = self.store.get_product(id).await? else {
            return Ok(None);
        };
        if !seed.is_active {
            return Ok(None);
        }

        // Fetch one extra row so the seed itself can be dropped.
        let query = ProductQuery {
            category: Some(seed.category),
            page_size: RELATED_LIMIT + 1,
            ..ProductQuery::default()
        };
        let items = self.store.list_products(&query).await?;
        Ok(Some(
            items
                .into_iter()
                .filter(|p| p.id != id)
                .take(RELATED_LIMIT as usize)
                .collect(),
        ))
    }
}

/// Build services from the environment.
///
/// Defaults to the in-memory store; set `USE_PERSISTENT_STORES=true`
/// (with `DATABASE_URL`) for Postgres.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        return build_persistent_services().await;
    }

    tracing::info!("using in-memory catalog store");
    AppServices::in_memory()
}

async fn build_persistent_services() -> AppServices {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    let store = PostgresCatalogStore::new(pool);
    store.migrate().await.expect("failed to run schema bootstrap");

    tracing::info!("using Postgres catalog store");
    AppServices::with_store(Arc::new(store))
}
