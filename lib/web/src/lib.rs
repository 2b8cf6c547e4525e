//! HTTP API of the explorer.
//!
//! Every handler looks up a route in the shared [`RouteRegistry`], builds the matching
//! descriptor and runs it through the [`Explorer`](explorer_engine::Explorer).

use axum::Router;
use explorer_engine::HttpSparqlEndpoint;
use explorer_routes::RouteRegistry;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod api;
mod config;
mod error;
mod state;

use crate::api::create_api_routes;
pub use config::ServerConfig;
pub use error::ExplorerServerError;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves the API for `registry` until the process is stopped.
pub async fn serve(config: ServerConfig, registry: RouteRegistry) -> anyhow::Result<()> {
    let endpoint = HttpSparqlEndpoint::new(config.endpoint.clone())?;
    let state = AppState::new(Arc::new(endpoint), Arc::new(registry))
        .with_results_per_page(config.results_per_page)
        .with_debug_queries(config.debug_queries);

    let app = create_router(state);
    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        endpoint = %config.endpoint.url,
        "Listening on {}",
        listener.local_addr()?
    );
    Ok(axum::serve(listener, app).await?)
}
