use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use gfc_catalog::{Category, Contact, NewContact, Product, ProductQuery};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Contact-form payload. Missing fields deserialize to empty strings so
/// every problem surfaces as one 400 with a field summary, not a
/// deserializer error.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "this field is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "this field is required"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "this field is required"))]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "this field is required"))]
    pub message: String,
    /// Optional product reference (by surrogate key).
    #[serde(default)]
    pub product: Option<i64>,
}

impl ContactRequest {
    /// Required fields must be non-empty *after* trimming.
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.subject = self.subject.trim().to_string();
        self.message = self.message.trim().to_string();
        self
    }

    pub fn into_new_contact(self) -> NewContact {
        NewContact {
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            product_id: self.product,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Raw listing query parameters; values are validated in
/// [`parse_product_query`] so malformed input yields a 400, not a 500.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub category: Option<String>,
    pub is_featured: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub fn parse_product_query(
    params: ListProductsParams,
) -> Result<ProductQuery, axum::response::Response> {
    let mut query = ProductQuery::default();

    if let Some(raw) = params.category.as_deref().filter(|s| !s.is_empty()) {
        let category = raw.parse::<Category>().map_err(|e| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_category", e.to_string())
        })?;
        query.category = Some(category);
    }

    if let Some(raw) = params.is_featured.as_deref().filter(|s| !s.is_empty()) {
        query.is_featured = Some(parse_bool(raw).ok_or_else(|| {
            errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_is_featured",
                "is_featured must be true/false/1/0",
            )
        })?);
    }

    if let Some(search) = params.search.filter(|s| !s.is_empty()) {
        query.search = Some(search);
    }

    if let Some(raw) = params.ordering.as_deref().filter(|s| !s.is_empty()) {
        let ordering = raw.parse().map_err(
            |e: gfc_core::DomainError| {
                errors::json_error(StatusCode::BAD_REQUEST, "invalid_ordering", e.to_string())
            },
        )?;
        query.ordering = Some(ordering);
    }

    if let Some(page) = params.page {
        if page == 0 {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_page",
                "page numbering starts at 1",
            ));
        }
        query.page = page;
    }

    if let Some(page_size) = params.page_size {
        if page_size == 0 {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_page_size",
                "page_size must be positive",
            ));
        }
        query.page_size = page_size;
    }

    Ok(query)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

// -------------------------
// JSON projections
// -------------------------

/// Listing projection: everything a storefront card needs, no internal
/// bookkeeping (timestamps, visibility flag, local image path).
pub fn product_list_json(p: &Product) -> serde_json::Value {
    json!({
        "id": p.id,
        "name": p.name,
        "model_code": p.model_code,
        "category": p.category.code(),
        "tagline": p.tagline,
        "description": p.description,
        "image_url": p.image_url,
        "price_pkr": p.price_pkr,
        "price_usd": p.price_usd,
        "specifications": p.specifications,
        "features": p.features,
        "rating": p.rating,
        "review_count": p.review_count,
        "is_featured": p.is_featured,
        "stock": p.stock,
    })
}

/// Detail projection: the full stored record.
pub fn product_detail_json(p: &Product) -> serde_json::Value {
    json!({
        "id": p.id,
        "name": p.name,
        "model_code": p.model_code,
        "category": p.category.code(),
        "tagline": p.tagline,
        "description": p.description,
        "image_url": p.image_url,
        "image_local": p.image_local,
        "price_pkr": p.price_pkr,
        "price_usd": p.price_usd,
        "specifications": p.specifications,
        "features": p.features,
        "rating": p.rating,
        "review_count": p.review_count,
        "is_active": p.is_active,
        "is_featured": p.is_featured,
        "stock": p.stock,
        "created_at": p.created_at,
        "updated_at": p.updated_at,
    })
}

/// Administrative contact projection (triage flag stays internal).
pub fn contact_json(c: &Contact) -> serde_json::Value {
    json!({
        "id": c.id,
        "name": c.name,
        "email": c.email,
        "phone": c.phone,
        "subject": c.subject,
        "message": c.message,
        "product": c.product_id,
        "created_at": c.created_at,
    })
}
