use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound customer inquiry.
///
/// `product_id` is a weak reference: deleting the product clears the
/// reference, it never deletes or blocks the inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub product_id: Option<i64>,
    /// Admin triage flag; never exposed on the public surface.
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new inquiry. Field-level validation happens at
/// the HTTP boundary; the store only enforces the product reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub product_id: Option<i64>,
}
