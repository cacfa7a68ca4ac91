//! `gfc-catalog` — the catalog data model.
//!
//! Pure domain types for the product catalog and the two public
//! submission records (contact inquiries, newsletter subscriptions).
//! Storage backends and HTTP wiring live in `gfc-store` / `gfc-api`.

pub mod category;
pub mod contact;
pub mod newsletter;
pub mod product;

pub use category::Category;
pub use contact::{Contact, NewContact};
pub use newsletter::Newsletter;
pub use product::{OrderField, Product, ProductDraft, ProductOrdering, ProductQuery};
