use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde_json::json;
use validator::ValidateEmail;

use crate::app::dto::NewsletterRequest;
use crate::app::errors::{json_error, store_error_to_response};
use crate::app::services::AppServices;
use gfc_store::SubscribeOutcome;

pub fn router() -> Router {
    Router::new().route("/", post(subscribe))
}

/// POST /api/newsletter/ — idempotent subscription.
///
/// 201 on first subscribe, 200 with "Already subscribed" after that;
/// the existing row is never touched again.
async fn subscribe(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<NewsletterRequest>,
) -> Response {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email is required" })),
        )
            .into_response();
    }
    if !email.validate_email() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "enter a valid email address",
        );
    }

    match services.store().subscribe(email).await {
        Ok(SubscribeOutcome::Created(subscriber)) => {
            tracing::info!(subscriber_id = subscriber.id, "newsletter subscription");
            (
                StatusCode::CREATED,
                Json(json!({ "detail": "Subscribed successfully" })),
            )
                .into_response()
        }
        Ok(SubscribeOutcome::AlreadySubscribed) => {
            Json(json!({ "detail": "Already subscribed" })).into_response()
        }
        Err(err) => store_error_to_response(err),
    }
}
