//! Aviationstack HTTP client: `GET <base>?access_key=..&flight_iata=..`.

use async_trait::async_trait;
use serde::Deserialize;

use super::{FlightInfo, FlightLookup};

const AVIATIONSTACK_URL: &str = "http://api.aviationstack.com/v1/flights";

fn aviationstack_url() -> String {
    std::env::var("AVIATIONSTACK_URL").unwrap_or_else(|_| AVIATIONSTACK_URL.to_string())
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Vec<FlightRecord>,
}

#[derive(Deserialize)]
struct FlightRecord {
    #[serde(default)]
    departure: Option<ScheduledTime>,
    #[serde(default)]
    arrival: Option<ScheduledTime>,
    #[serde(default)]
    flight_status: Option<String>,
}

#[derive(Deserialize)]
struct ScheduledTime {
    #[serde(default)]
    scheduled: Option<String>,
}

fn first_flight(response: LookupResponse) -> Option<FlightInfo> {
    let record = response.data.into_iter().next()?;
    Some(FlightInfo {
        departure: record.departure.and_then(|t| t.scheduled),
        arrival: record.arrival.and_then(|t| t.scheduled),
        status: record.flight_status,
    })
}

pub struct AviationstackClient {
    client: reqwest::Client,
    access_key: String,
}

impl AviationstackClient {
    /// `access_key` may be empty (unset credential); the provider then rejects
    /// the request and the lookup comes back empty like any other failure.
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key: access_key.into(),
        }
    }

    async fn fetch(&self, flight_iata: &str) -> Result<Option<FlightInfo>, String> {
        let res = self
            .client
            .get(aviationstack_url())
            .query(&[("access_key", self.access_key.as_str()), ("flight_iata", flight_iata)])
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = res.status();
        if !status.is_success() {
            return Err(format!("provider returned {}", status));
        }
        let body: LookupResponse = res.json().await.map_err(|e| e.to_string())?;
        Ok(first_flight(body))
    }
}

#[async_trait]
impl FlightLookup for AviationstackClient {
    async fn lookup(&self, flight_iata: &str) -> Option<FlightInfo> {
        match self.fetch(flight_iata).await {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                tracing::warn!(flight = flight_iata, "flight lookup returned no data");
                None
            }
            Err(error) => {
                tracing::warn!(flight = flight_iata, %error, "flight lookup failed");
                None
            }
        }
    }
}
