use async_trait::async_trait;
use thiserror::Error;

use gfc_catalog::{Contact, NewContact, Newsletter, Product, ProductDraft, ProductQuery};

/// Catalog store operation error.
///
/// These are **infrastructure-boundary** errors. Constraint violations
/// are mapped to dedicated variants so the HTTP layer can translate
/// them (a duplicate newsletter e-mail is not a 500, a dangling product
/// reference on a contact is a 400) instead of surfacing raw storage
/// errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated; carries the logical field name.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),

    /// A referenced row does not exist; carries the referencing field.
    #[error("foreign key violated on {0}")]
    ForeignKeyViolation(&'static str),

    /// The record failed a data-layer invariant (rating bounds, negative
    /// counters, blank business keys).
    #[error("invalid record: {0}")]
    Invalid(String),

    /// Anything the backend could not handle; callers treat this as a
    /// 500-class failure and never retry.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Outcome of the atomic newsletter get-or-create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new subscription row was created.
    Created(Newsletter),
    /// A row for this e-mail already existed; it was left untouched
    /// (even if soft-unsubscribed).
    AlreadySubscribed,
}

/// The Catalog Repository seam.
///
/// One store call per request: every method is a single read or a
/// single atomic write. Implementations must resolve write races via
/// their own uniqueness/reference constraints, never read-then-write:
///
/// - `subscribe` is get-or-create on the unique e-mail key;
/// - `insert_contact` checks the product reference atomically with the
///   insert;
/// - `upsert_product` is insert-or-update keyed by `model_code`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Active products matching the query, ordered and paginated.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    /// A product by surrogate key, regardless of `is_active`.
    ///
    /// Visibility policy belongs to callers: the public detail endpoint
    /// hides inactive rows, while the contact form accepts references
    /// to them.
    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Administrative insert-or-update keyed by `model_code`.
    ///
    /// Preserves `id` and `created_at` on update and refreshes
    /// `updated_at`. Rejects drafts that violate the data-layer
    /// invariants or collide on `name`.
    async fn upsert_product(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// Administrative delete. Clears the `product_id` of referencing
    /// contacts (set-null, never cascade). Returns `false` when the id
    /// did not resolve.
    async fn delete_product(&self, id: i64) -> Result<bool, StoreError>;

    /// Persist a new inquiry (`is_read = false`, `created_at = now`).
    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, StoreError>;

    /// All inquiries, newest first (administrative).
    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError>;

    /// Flip an inquiry's triage flag (administrative). Returns `false`
    /// when the id did not resolve.
    async fn mark_contact_read(&self, id: i64) -> Result<bool, StoreError>;

    /// Atomic newsletter get-or-create on the unique e-mail key.
    async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, StoreError>;

    /// All subscription rows (administrative).
    async fn list_subscribers(&self) -> Result<Vec<Newsletter>, StoreError>;
}
