//! HTTP surface over the lookup pipeline.
//!
//! Routes:
//! - `GET /` landing page
//! - `GET /health`
//! - `GET /api/lookup?query=<value>&pretty=1`
//! - `GET /api/lookup/<value>`
//! - `POST /api/lookup` with `{"query": "<value>"}`
//!
//! Every error, including undecodable requests and unknown routes, is JSON
//! carrying the attribution.

pub mod handlers;

use axum::{Router, routing::get};
use tokio::net::TcpListener;

use crate::error::Result;
use crate::models::ServerConfig;
use crate::pipeline::LookupPipeline;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: LookupPipeline,
}

/// Build the router.
pub fn router(pipeline: LookupPipeline) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route(
            "/api/lookup",
            get(handlers::lookup_query).post(handlers::lookup_body),
        )
        .route("/api/lookup/*value", get(handlers::lookup_path))
        .fallback(handlers::not_found)
        .with_state(AppState { pipeline })
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, pipeline: LookupPipeline) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}
