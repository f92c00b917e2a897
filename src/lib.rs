pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export engine types
pub use error::{SandboxError, SandboxResult};
pub use logic::{
    canonical_json, BodyMatcher, DefaultReason, ParamCheck, ParameterValidator, Resolution,
    ResolutionSource, SandboxPlayer, UnauthorizedFallback,
};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use std::sync::Arc;

/// Serve the sandbox API for `store` until the listener fails
pub async fn serve<S: Store + 'static>(
    store: Arc<S>,
    config: &crate::config::AppConfig,
) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let app: axum::Router = routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Developer portal sandbox running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
