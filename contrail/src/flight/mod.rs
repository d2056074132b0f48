//! Flight data lookup.
//!
//! A lookup either produces a [`FlightInfo`] snapshot or nothing; there is no
//! error path for callers to handle. A cosmetic data-source outage must never
//! break the conversation, so every failure collapses to `None` at this seam.

mod aviationstack;

use async_trait::async_trait;

pub use aviationstack::AviationstackClient;

/// Transient snapshot of one flight. Absent fields mean the provider had no
/// data (or the lookup failed), never a hard error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightInfo {
    /// Scheduled departure timestamp, as reported by the provider.
    pub departure: Option<String>,
    /// Scheduled arrival timestamp, as reported by the provider.
    pub arrival: Option<String>,
    /// Flight status string, e.g. "landed".
    pub status: Option<String>,
}

/// One-shot flight lookup by IATA flight number.
#[async_trait]
pub trait FlightLookup: Send + Sync {
    /// Fetches current data for `flight_iata`. A single attempt; any failure
    /// is logged by the implementation and returned as `None`.
    async fn lookup(&self, flight_iata: &str) -> Option<FlightInfo>;
}
