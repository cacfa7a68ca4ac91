//! `gfc-store` — the Catalog Repository.
//!
//! `CatalogStore` is the storage seam: an in-memory backend for dev and
//! tests, and a Postgres backend for production. Both enforce the same
//! constraints (unique `model_code`/`name`/`email`, the weak contact →
//! product reference) so callers can translate `StoreError` uniformly.

pub mod seed;
pub mod store;

pub use seed::{load_seed, seed_catalog};
pub use store::in_memory::InMemoryCatalogStore;
pub use store::postgres::PostgresCatalogStore;
pub use store::r#trait::{CatalogStore, StoreError, SubscribeOutcome};
