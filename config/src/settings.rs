//! Typed settings read from the process environment.

use thiserror::Error;

const DEFAULT_SERVE_ADDR: &str = "127.0.0.1:8080";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("OPENAI_API_KEY is not set")]
    MissingAssistantApiKey,
}

/// Service configuration. `assistant_id` and `flight_api_key` stay optional
/// here: the gateway rejects a request at time of use when the assistant
/// identity is missing, and a missing flight credential only makes lookups
/// come back empty.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Credential for the remote assistant/thread service (`OPENAI_API_KEY`).
    pub assistant_api_key: String,
    /// Fixed assistant identity runs are created against (`OPENAI_ASSISTANT_ID`).
    pub assistant_id: Option<String>,
    /// Credential for the flight-data provider (`AVIATIONSTACK_API_KEY`).
    pub flight_api_key: Option<String>,
    /// HTTP bind address (`SERVE_ADDR`, default `127.0.0.1:8080`).
    pub serve_addr: String,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; the seam keeps tests off the global
    /// process environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let assistant_api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(SettingsError::MissingAssistantApiKey)?;
        Ok(Settings {
            assistant_api_key,
            assistant_id: lookup("OPENAI_ASSISTANT_ID").filter(|v| !v.is_empty()),
            flight_api_key: lookup("AVIATIONSTACK_API_KEY").filter(|v| !v.is_empty()),
            serve_addr: lookup("SERVE_ADDR").unwrap_or_else(|| DEFAULT_SERVE_ADDR.to_string()),
        })
    }
}
