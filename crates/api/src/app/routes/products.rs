use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;

use gfc_catalog::Category;

use crate::app::dto::{self, ListProductsParams};
use crate::app::errors::{json_error, store_error_to_response};
use crate::app::services::AppServices;

pub fn router() -> Router {
    // Slash-free paths: the normalize layer trims trailing slashes
    // before routing. Static segments win over the `:id` capture, so
    // `featured` and friends can live beside the detail route.
    Router::new()
        .route("/", get(list_products))
        .route("/featured", get(featured_products))
        .route("/by_category", get(products_by_category))
        .route("/categories", get(list_categories))
        .route("/:id", get(product_detail))
        .route("/:id/related", get(related_products))
}

/// GET /api/products/ — active products, filtered/searched/ordered/paged.
async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListProductsParams>,
) -> Response {
    let query = match dto::parse_product_query(params) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match services.store().list_products(&query).await {
        Ok(products) => {
            let body: Vec<_> = products.iter().map(dto::product_list_json).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}

/// GET /api/products/featured/ — the featured strip (at most 6).
async fn featured_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.featured_products().await {
        Ok(products) => {
            let body: Vec<_> = products.iter().map(dto::product_list_json).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}

/// GET /api/products/by_category/ — up to 3 products per non-empty
/// category, keyed by category code.
async fn products_by_category(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.products_by_category().await {
        Ok(groups) => {
            let mut body = serde_json::Map::new();
            for (category, products) in &groups {
                let items: Vec<_> = products.iter().map(dto::product_list_json).collect();
                body.insert(category.code().to_string(), json!(items));
            }
            Json(serde_json::Value::Object(body)).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}

/// GET /api/products/categories/ — every category with its display name.
async fn list_categories() -> Response {
    let body: Vec<_> = Category::ALL
        .iter()
        .map(|c| json!({ "id": c.code(), "name": c.display_name() }))
        .collect();
    Json(body).into_response()
}

/// GET /api/products/:id/ — full record for one active product.
async fn product_detail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };

    match services.store().get_product(id).await {
        Ok(Some(product)) if product.is_active => {
            Json(dto::product_detail_json(&product)).into_response()
        }
        Ok(_) => not_found(),
        Err(err) => store_error_to_response(err),
    }
}

/// GET /api/products/:id/related/ — up to 4 active products sharing the
/// product's category, the product itself excluded.
async fn related_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };

    match services.related_products(id).await {
        Ok(Some(products)) => {
            let body: Vec<_> = products.iter().map(dto::product_list_json).collect();
            Json(body).into_response()
        }
        Ok(None) => not_found(),
        Err(err) => store_error_to_response(err),
    }
}

// Non-numeric path ids are indistinguishable from unknown products.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
}
