use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;

#[tokio::main]
async fn main() {
    gfc_api::telemetry::init();

    let services = Arc::new(gfc_api::app::services::build_services().await);

    let seed = std::env::var("SEED_DEMO_CATALOG")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);
    if seed {
        let count = gfc_store::load_seed(services.store())
            .await
            .expect("failed to load the seed catalog");
        tracing::info!(count, "demo catalog ready");
    }

    let app = gfc_api::app::build_app(services);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .unwrap();
}
