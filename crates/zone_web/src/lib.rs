use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/v1/articles/ingest", post(handlers::ingest))
        .route("/v1/articles", get(handlers::list_articles))
        .route("/v1/articles/urls", get(handlers::list_urls))
        .route("/v1/articles/findByUrl", get(handlers::find_by_url))
        .layer(cors)
        .with_state(Arc::new(state))
}
