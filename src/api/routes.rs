use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Sandbox playback
        .route("/sandbox/play", post(handlers::play_api::<S>))
        // Read-only endpoint browsing for the sandbox UI
        .route(
            "/sandbox/endpoints/:endpoint_id",
            get(handlers::get_endpoint::<S>),
        )
        .route(
            "/sandbox/endpoints/:endpoint_id/examples",
            get(handlers::list_endpoint_examples::<S>),
        )
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}
