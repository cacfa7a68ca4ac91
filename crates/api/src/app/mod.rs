//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: store wiring + the derived catalog views
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs, query-parameter parsing, JSON projections
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router over an already-wired service set.
///
/// The public catalog is served to a separate frontend origin, hence
/// the permissive CORS layer.
///
/// Trailing slashes are trimmed *before* routing (the normalize layer
/// must wrap the router, not sit inside `.layer()`), so every resource
/// answers on both `/api/products` and `/api/products/`.
pub fn build_app(services: Arc<AppServices>) -> NormalizePath<Router> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
