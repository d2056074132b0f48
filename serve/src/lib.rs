//! HTTP gateway for contrail (axum).
//!
//! `POST /assistant` accepts `{threadId?, message}`, drives one assistant run
//! to completion, and streams typed frames back; `GET /health` for liveness.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`].

mod app;
mod gateway;
mod producer;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use app::{gateway_config_from_env, AppState, GatewayConfig};

/// Runs the HTTP server on an existing listener. Used by tests (bind to
/// 127.0.0.1:0 with mock state, then pass the listener).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);
    axum::serve(listener, app::router(state)).await?;
    Ok(())
}

/// Runs the HTTP server with state built from environment settings.
/// Listens on `addr` when given, else `SERVE_ADDR`, else 127.0.0.1:8080.
pub async fn run_serve(addr: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = env_config::Settings::from_env()?;
    let addr = addr.unwrap_or(settings.serve_addr.as_str());
    let listener = TcpListener::bind(addr).await?;
    let state = Arc::new(AppState::from_settings(&settings));
    run_serve_on_listener(listener, state).await
}
