use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gfc_core::{DomainError, DomainResult};

use crate::category::Category;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Hard cap on page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A catalog item.
///
/// Products are written only through the administrative path (seed
/// loader / store API); the public HTTP surface never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Unique business key, e.g. `GFC-FUTURE`.
    pub model_code: String,
    /// Unique display name.
    pub name: String,
    pub category: Category,
    pub tagline: String,
    pub description: String,
    /// External image URL.
    pub image_url: String,
    /// Optional locally stored image path (admin-managed).
    pub image_local: Option<String>,
    pub price_pkr: Decimal,
    pub price_usd: Option<Decimal>,
    /// Schema-free per-category attributes ("RPM" -> "1400", ...).
    pub specifications: BTreeMap<String, String>,
    /// Ordered marketing bullet points.
    pub features: Vec<String>,
    /// Always within `[0.0, 5.0]`.
    pub rating: f64,
    pub review_count: i32,
    /// Soft-delete flag: inactive products are invisible to the public API.
    pub is_active: bool,
    pub is_featured: bool,
    /// Informational only; there are no reservation semantics.
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the administrative upsert, keyed by `model_code`.
///
/// Carries every mutable field; identity (`id`) and `created_at` are
/// owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub model_code: String,
    pub name: String,
    pub category: Category,
    pub tagline: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub image_local: Option<String>,
    pub price_pkr: Decimal,
    #[serde(default)]
    pub price_usd: Option<Decimal>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub stock: i32,
}

fn default_true() -> bool {
    true
}

impl ProductDraft {
    /// Check the data-layer invariants before the draft reaches a store.
    pub fn validate(&self) -> DomainResult<()> {
        if self.model_code.trim().is_empty() {
            return Err(DomainError::validation("model_code must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(DomainError::validation(format!(
                "rating must be within [0, 5], got {}",
                self.rating
            )));
        }
        if self.review_count < 0 {
            return Err(DomainError::validation("review_count must not be negative"));
        }
        if self.stock < 0 {
            return Err(DomainError::validation("stock must not be negative"));
        }
        Ok(())
    }
}

/// Sortable fields exposed on the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    PricePkr,
    Rating,
    CreatedAt,
}

/// Explicit listing order, parsed from the `ordering` query parameter
/// (`price_pkr`, `rating`, `created_at`, optionally `-`-prefixed for
/// descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl core::str::FromStr for ProductOrdering {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "price_pkr" => OrderField::PricePkr,
            "rating" => OrderField::Rating,
            "created_at" => OrderField::CreatedAt,
            _ => {
                return Err(DomainError::validation(format!(
                    "ordering must be one of price_pkr, rating, created_at (got '{s}')"
                )));
            }
        };
        Ok(ProductOrdering { field, descending })
    }
}

/// A catalog listing request: filters, free-text search, ordering and
/// pagination. Only active products are ever considered.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub is_featured: Option<bool>,
    /// Case-insensitive substring, OR-combined over name / model_code /
    /// description.
    pub search: Option<String>,
    /// `None` means the default order: featured first, then newest first.
    pub ordering: Option<ProductOrdering>,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            is_featured: None,
            search: None,
            ordering: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Page size after clamping to the hard cap.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.min(MAX_PAGE_SIZE).max(1)
    }

    /// Row offset for the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.effective_page_size())
    }

    /// Whether an (active) product satisfies the filter + search parts
    /// of this query. Used by the in-memory backend; the SQL backend
    /// expresses the same predicate in its WHERE clause.
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_active {
            return false;
        }
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(featured) = self.is_featured {
            if product.is_featured != featured {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if needle.is_empty() {
                return true;
            }
            let hit = product.name.to_lowercase().contains(&needle)
                || product.model_code.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Comparator for this query's ordering.
    ///
    /// Default order is featured-first then newest-first; explicit
    /// orderings replace the default entirely. Ties break on `id` so
    /// pagination is stable.
    pub fn compare(&self, a: &Product, b: &Product) -> core::cmp::Ordering {
        match self.ordering {
            None => b
                .is_featured
                .cmp(&a.is_featured)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id)),
            Some(ProductOrdering { field, descending }) => {
                let ord = match field {
                    OrderField::PricePkr => a.price_pkr.cmp(&b.price_pkr),
                    OrderField::Rating => a.rating.total_cmp(&b.rating),
                    OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                let ord = if descending { ord.reverse() } else { ord };
                ord.then(a.id.cmp(&b.id))
            }
        }
    }
}
