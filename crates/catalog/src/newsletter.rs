use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A newsletter subscription.
///
/// `email` is the unique key. `is_active` is a soft-unsubscribe flag;
/// note that re-subscribing an inactive e-mail is deliberately a no-op
/// on the public surface (it reports "already subscribed").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newsletter {
    pub id: i64,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}
