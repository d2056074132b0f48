//! Axum app: state, router, and gateway configuration.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use contrail::{
    poll_policy_from_env, AssistantApi, AviationstackClient, FlightLookup, OpenAiAssistantClient,
    PollPolicy,
};
use env_config::Settings;

use super::gateway::handle_assistant;

/// Gateway configuration: frame channel bound and run polling knobs.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Max frames buffered between the producer task and the response body.
    pub frame_queue_capacity: usize,
    /// Polling policy for driving runs.
    pub poll: PollPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            frame_queue_capacity: 64,
            poll: PollPolicy::default(),
        }
    }
}

/// Builds a [`GatewayConfig`] from environment variables, falling back to
/// [`Default`] for unset or invalid values.
///
/// - `SERVE_FRAME_QUEUE_CAPACITY` (default 64)
/// - poll knobs: see [`poll_policy_from_env`]
pub fn gateway_config_from_env() -> GatewayConfig {
    let default = GatewayConfig::default();
    GatewayConfig {
        frame_queue_capacity: std::env::var("SERVE_FRAME_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(default.frame_queue_capacity),
        poll: poll_policy_from_env(),
    }
}

/// Shared state for the gateway. Injected into the router and cloned per
/// request; the collaborators are trait objects so tests can swap in scripted
/// implementations.
pub struct AppState {
    pub(crate) assistant: Arc<dyn AssistantApi>,
    pub(crate) flights: Arc<dyn FlightLookup>,
    /// Fixed assistant identity runs are created against. Its absence fails a
    /// request at time of use, before any run exists.
    pub(crate) assistant_id: Option<String>,
    pub(crate) config: GatewayConfig,
}

impl AppState {
    pub fn new(
        assistant: Arc<dyn AssistantApi>,
        flights: Arc<dyn FlightLookup>,
        assistant_id: Option<String>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            assistant,
            flights,
            assistant_id,
            config,
        }
    }

    /// Production wiring: HTTP clients for the assistant service and the
    /// flight-data provider, config from the environment.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(OpenAiAssistantClient::new(
                settings.assistant_api_key.clone(),
            )),
            Arc::new(AviationstackClient::new(
                settings.flight_api_key.clone().unwrap_or_default(),
            )),
            settings.assistant_id.clone(),
            gateway_config_from_env(),
        )
    }
}

/// Builds the router: `POST /assistant` and `GET /health`.
pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assistant", post(handle_assistant))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
