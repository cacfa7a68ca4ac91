use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use validator::Validate;

use crate::app::dto::{self, ContactRequest};
use crate::app::errors::{json_error, store_error_to_response, validation_message};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(submit_contact))
        .route("/", get(list_contacts))
}

/// POST /api/contact/ — record a contact-form submission.
///
/// The store enforces the optional product reference, so a product
/// deleted between lookup and insert still comes back as a clean 400.
async fn submit_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<ContactRequest>,
) -> Response {
    let request = request.trimmed();
    if let Err(errors) = request.validate() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            validation_message(&errors),
        );
    }

    match services.store().insert_contact(request.into_new_contact()).await {
        Ok(contact) => {
            tracing::info!(contact_id = contact.id, "contact message received");
            (
                StatusCode::CREATED,
                Json(json!({ "detail": "Message sent successfully" })),
            )
                .into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}

/// GET /api/contact/ — all submissions, newest first.
async fn list_contacts(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.store().list_contacts().await {
        Ok(contacts) => {
            let body: Vec<_> = contacts.iter().map(dto::contact_json).collect();
            Json(body).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}
