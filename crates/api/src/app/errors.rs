use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gfc_store::StoreError;

/// Translate a store failure into an HTTP response.
///
/// Constraint violations are client errors (the store is the final
/// arbiter of uniqueness/references under concurrency); everything else
/// is a 500 and is never retried here.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::ForeignKeyViolation(field) => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} does not reference an existing product"),
        ),
        StoreError::UniqueViolation(field) => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} already exists"),
        ),
        StoreError::Invalid(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "catalog store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage failure",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Flatten `validator` output into a single summary message,
/// field-sorted so responses are stable.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_deref())
                .collect::<Vec<_>>()
                .join(", ");
            if detail.is_empty() {
                format!("{field}: invalid value")
            } else {
                format!("{field}: {detail}")
            }
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
