//! HTTP API boundary.
//!
//! Thin axum surface over the cache, the OEM client pool, and the mapping
//! engine. Fatal classification lives here: unknown endpoint names and
//! missing root targets become 404s and upstream OEM failures become 502s,
//! while the engine itself never fails.

pub mod error;
pub mod rate_limit;
mod routes;

pub use error::{ApiError, ApiResult};
pub use rate_limit::RouteRateLimiter;

use crate::storage::ConfigStore;
use anyhow::{Context, Result};
use axum::Router;
use emscope_client::ClientPool;
use emscope_db::CatalogDb;
use emscope_protocol::paths;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared state behind every route.
pub struct AppState {
    pub db: CatalogDb,
    pub pool: ClientPool,
    pub store: ConfigStore,
    pub limiter: RouteRateLimiter,
}

impl AppState {
    /// State wired to the default on-disk locations.
    pub async fn initialize() -> Result<Self> {
        let db = CatalogDb::open(paths::default_cache_db_path())
            .await
            .context("Failed to open catalog cache")?;
        Ok(Self {
            db,
            pool: ClientPool::default(),
            store: ConfigStore::from_default_paths(),
            limiter: RouteRateLimiter::default(),
        })
    }
}

/// Build the API router with rate limiting applied to every route.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit::limit_requests,
        ))
        .with_state(state)
}

/// Serve the API until the process is stopped.
pub async fn serve(state: Arc<AppState>, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(%bind, "emscope API listening");
    axum::serve(listener, router(state))
        .await
        .context("API server exited")?;
    Ok(())
}
