use axum::Router;

pub mod contact;
pub mod newsletter;
pub mod products;
pub mod system;

/// All `/api`-prefixed routes.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/contact", contact::router())
        .nest("/newsletter", newsletter::router())
}
