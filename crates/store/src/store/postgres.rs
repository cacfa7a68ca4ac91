use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;

use gfc_catalog::{
    Category, Contact, NewContact, Newsletter, OrderField, Product, ProductDraft, ProductOrdering,
    ProductQuery,
};

use super::r#trait::{CatalogStore, StoreError, SubscribeOutcome};

const PRODUCT_COLUMNS: &str = "id, model_code, name, category, tagline, description, image_url, \
     image_local, price_pkr, price_usd, specifications, features, rating, review_count, \
     is_active, is_featured, stock, created_at, updated_at";

const CONTACT_COLUMNS: &str = "id, name, email, phone, subject, message, product_id, is_read, created_at";

const NEWSLETTER_COLUMNS: &str = "id, email, subscribed_at, is_active";

/// Schema bootstrap, mirroring the constraints the domain relies on:
/// unique `model_code`/`name`/`email`, the rating CHECK, and the
/// set-null weak reference from contacts to products.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id             BIGSERIAL PRIMARY KEY,
        model_code     TEXT NOT NULL UNIQUE,
        name           TEXT NOT NULL UNIQUE,
        category       TEXT NOT NULL,
        tagline        TEXT NOT NULL DEFAULT '',
        description    TEXT NOT NULL DEFAULT '',
        image_url      TEXT NOT NULL DEFAULT '',
        image_local    TEXT,
        price_pkr      NUMERIC(10, 2) NOT NULL,
        price_usd      NUMERIC(10, 2),
        specifications JSONB NOT NULL DEFAULT '{}'::jsonb,
        features       JSONB NOT NULL DEFAULT '[]'::jsonb,
        rating         DOUBLE PRECISION NOT NULL DEFAULT 0
                       CHECK (rating >= 0 AND rating <= 5),
        review_count   INTEGER NOT NULL DEFAULT 0 CHECK (review_count >= 0),
        is_active      BOOLEAN NOT NULL DEFAULT TRUE,
        is_featured    BOOLEAN NOT NULL DEFAULT FALSE,
        stock          INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products (category)",
    "CREATE INDEX IF NOT EXISTS idx_products_is_active ON products (is_active)",
    "CREATE INDEX IF NOT EXISTS idx_products_is_featured ON products (is_featured)",
    r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id         BIGSERIAL PRIMARY KEY,
        name       TEXT NOT NULL,
        email      TEXT NOT NULL,
        phone      TEXT NOT NULL,
        subject    TEXT NOT NULL,
        message    TEXT NOT NULL,
        product_id BIGINT REFERENCES products (id) ON DELETE SET NULL,
        is_read    BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS newsletter (
        id            BIGSERIAL PRIMARY KEY,
        email         TEXT NOT NULL UNIQUE,
        subscribed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        is_active     BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
];

/// Postgres-backed catalog store.
///
/// Uses runtime queries only, so the workspace builds without a live
/// database. Constraint races (duplicate newsletter e-mail, contact
/// referencing a just-deleted product) are resolved by the database and
/// mapped to `StoreError` variants.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self, query), err)]
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = TRUE"
        ));

        if let Some(category) = query.category {
            qb.push(" AND category = ");
            qb.push_bind(category.code());
        }
        if let Some(featured) = query.is_featured {
            qb.push(" AND is_featured = ");
            qb.push_bind(featured);
        }
        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR model_code ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        match query.ordering {
            None => {
                qb.push(" ORDER BY is_featured DESC, created_at DESC, id DESC");
            }
            Some(ProductOrdering { field, descending }) => {
                let column = match field {
                    OrderField::PricePkr => "price_pkr",
                    OrderField::Rating => "rating",
                    OrderField::CreatedAt => "created_at",
                };
                let direction = if descending { "DESC" } else { "ASC" };
                qb.push(format!(" ORDER BY {column} {direction}, id ASC"));
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(i64::from(query.effective_page_size()));
        qb.push(" OFFSET ");
        qb.push_bind(query.offset() as i64);

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, draft), fields(model_code = %draft.model_code), err)]
    async fn upsert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        draft.validate().map_err(|e| StoreError::Invalid(e.to_string()))?;

        let specifications = serde_json::to_value(&draft.specifications)
            .map_err(|e| StoreError::Invalid(format!("specifications not serializable: {e}")))?;
        let features = serde_json::to_value(&draft.features)
            .map_err(|e| StoreError::Invalid(format!("features not serializable: {e}")))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (
                model_code, name, category, tagline, description, image_url, image_local,
                price_pkr, price_usd, specifications, features, rating, review_count,
                is_active, is_featured, stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (model_code) DO UPDATE SET
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                tagline = EXCLUDED.tagline,
                description = EXCLUDED.description,
                image_url = EXCLUDED.image_url,
                image_local = EXCLUDED.image_local,
                price_pkr = EXCLUDED.price_pkr,
                price_usd = EXCLUDED.price_usd,
                specifications = EXCLUDED.specifications,
                features = EXCLUDED.features,
                rating = EXCLUDED.rating,
                review_count = EXCLUDED.review_count,
                is_active = EXCLUDED.is_active,
                is_featured = EXCLUDED.is_featured,
                stock = EXCLUDED.stock,
                updated_at = now()
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&draft.model_code)
        .bind(&draft.name)
        .bind(draft.category.code())
        .bind(&draft.tagline)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(&draft.image_local)
        .bind(draft.price_pkr)
        .bind(draft.price_usd)
        .bind(specifications)
        .bind(features)
        .bind(draft.rating)
        .bind(draft.review_count)
        .bind(draft.is_active)
        .bind(draft.is_featured)
        .bind(draft.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_product", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        // The ON DELETE SET NULL reference from contacts does the
        // clearing.
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, contact), err)]
    async fn insert_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO contacts (name, email, phone, subject, message, product_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_contact", e))?;

        contact_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_contacts", e))?;
        rows.iter().map(contact_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn mark_contact_read(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE contacts SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("mark_contact_read", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, email), err)]
    async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, StoreError> {
        // Atomic get-or-create: the unique index arbitrates concurrent
        // submissions; existing rows stay untouched.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO newsletter (email) VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            RETURNING {NEWSLETTER_COLUMNS}
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("subscribe", e))?;

        match row {
            Some(row) => Ok(SubscribeOutcome::Created(newsletter_from_row(&row)?)),
            None => Ok(SubscribeOutcome::AlreadySubscribed),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_subscribers(&self) -> Result<Vec<Newsletter>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {NEWSLETTER_COLUMNS} FROM newsletter ORDER BY subscribed_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_subscribers", e))?;
        rows.iter().map(newsletter_from_row).collect()
    }
}

/// Escape LIKE wildcards so user search terms match literally.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn map_sqlx_error(operation: &'static str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::UniqueViolation(match db.constraint() {
                Some(c) if c.contains("email") => "email",
                Some(c) if c.contains("model_code") => "model_code",
                Some(c) if c.contains("name") => "name",
                _ => "unknown",
            });
        }
        if db.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation("product_id");
        }
        if db.is_check_violation() {
            return StoreError::Invalid(db.message().to_string());
        }
    }
    StoreError::Backend(format!("{operation}: {e}"))
}

fn decode_error(column: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Backend(format!("failed to decode column '{column}': {e}"))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let category_code: String = row.try_get("category").map_err(decode_error("category"))?;
    let category: Category = category_code
        .parse()
        .map_err(|e| StoreError::Backend(format!("corrupt category column: {e}")))?;

    let specifications: JsonValue = row
        .try_get("specifications")
        .map_err(decode_error("specifications"))?;
    let specifications: BTreeMap<String, String> = serde_json::from_value(specifications)
        .map_err(|e| StoreError::Backend(format!("corrupt specifications column: {e}")))?;

    let features: JsonValue = row.try_get("features").map_err(decode_error("features"))?;
    let features: Vec<String> = serde_json::from_value(features)
        .map_err(|e| StoreError::Backend(format!("corrupt features column: {e}")))?;

    Ok(Product {
        id: row.try_get("id").map_err(decode_error("id"))?,
        model_code: row.try_get("model_code").map_err(decode_error("model_code"))?,
        name: row.try_get("name").map_err(decode_error("name"))?,
        category,
        tagline: row.try_get("tagline").map_err(decode_error("tagline"))?,
        description: row.try_get("description").map_err(decode_error("description"))?,
        image_url: row.try_get("image_url").map_err(decode_error("image_url"))?,
        image_local: row.try_get("image_local").map_err(decode_error("image_local"))?,
        price_pkr: row.try_get::<Decimal, _>("price_pkr").map_err(decode_error("price_pkr"))?,
        price_usd: row
            .try_get::<Option<Decimal>, _>("price_usd")
            .map_err(decode_error("price_usd"))?,
        specifications,
        features,
        rating: row.try_get("rating").map_err(decode_error("rating"))?,
        review_count: row.try_get("review_count").map_err(decode_error("review_count"))?,
        is_active: row.try_get("is_active").map_err(decode_error("is_active"))?,
        is_featured: row.try_get("is_featured").map_err(decode_error("is_featured"))?,
        stock: row.try_get("stock").map_err(decode_error("stock"))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(decode_error("created_at"))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(decode_error("updated_at"))?,
    })
}

fn contact_from_row(row: &PgRow) -> Result<Contact, StoreError> {
    Ok(Contact {
        id: row.try_get("id").map_err(decode_error("id"))?,
        name: row.try_get("name").map_err(decode_error("name"))?,
        email: row.try_get("email").map_err(decode_error("email"))?,
        phone: row.try_get("phone").map_err(decode_error("phone"))?,
        subject: row.try_get("subject").map_err(decode_error("subject"))?,
        message: row.try_get("message").map_err(decode_error("message"))?,
        product_id: row.try_get("product_id").map_err(decode_error("product_id"))?,
        is_read: row.try_get("is_read").map_err(decode_error("is_read"))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(decode_error("created_at"))?,
    })
}

fn newsletter_from_row(row: &PgRow) -> Result<Newsletter, StoreError> {
    Ok(Newsletter {
        id: row.try_get("id").map_err(decode_error("id"))?,
        email: row.try_get("email").map_err(decode_error("email"))?,
        subscribed_at: row
            .try_get::<DateTime<Utc>, _>("subscribed_at")
            .map_err(decode_error("subscribed_at"))?,
        is_active: row.try_get("is_active").map_err(decode_error("is_active"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("GFC_400"), "GFC\\_400");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
