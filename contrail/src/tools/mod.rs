//! Tool dispatch: pending tool calls from a paused run to tool outputs.
//!
//! The supported tool set is closed: three flight operations keyed by wire
//! name. Each dispatch parses the call's JSON arguments, performs one flight
//! lookup, emits a data event when the requested field is present, and
//! produces the textual output submitted back to the run.

use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::assistant::{ToolCall, ToolOutput};
use crate::flight::{FlightInfo, FlightLookup};
use stream_frame::StreamFrame;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown tool call: {0}")]
    UnknownTool(String),
    #[error("{tool}: invalid arguments: {source}")]
    BadArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The three flight operations the remote assistant may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightTool {
    DepartureTime,
    ArrivalTime,
    FlightStatus,
}

impl FlightTool {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "get_departure_time" => Some(FlightTool::DepartureTime),
            "get_arrival_time" => Some(FlightTool::ArrivalTime),
            "get_flight_status" => Some(FlightTool::FlightStatus),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlightTool::DepartureTime => "get_departure_time",
            FlightTool::ArrivalTime => "get_arrival_time",
            FlightTool::FlightStatus => "get_flight_status",
        }
    }

    /// Data-event name, e.g. `flight_status`.
    fn event_name(self) -> &'static str {
        match self {
            FlightTool::DepartureTime => "departure_time",
            FlightTool::ArrivalTime => "arrival_time",
            FlightTool::FlightStatus => "flight_status",
        }
    }

    /// Key the raw value is carried under in the data-event payload.
    fn field_key(self) -> &'static str {
        match self {
            FlightTool::DepartureTime => "departure",
            FlightTool::ArrivalTime => "arrival",
            FlightTool::FlightStatus => "status",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FlightTool::DepartureTime => "Departure",
            FlightTool::ArrivalTime => "Arrival",
            FlightTool::FlightStatus => "Flight status",
        }
    }

    /// The field of [`FlightInfo`] this tool reports.
    fn select(self, info: &FlightInfo) -> Option<String> {
        match self {
            FlightTool::DepartureTime => info.departure.clone(),
            FlightTool::ArrivalTime => info.arrival.clone(),
            FlightTool::FlightStatus => info.status.clone(),
        }
    }

    /// Textual tool output. A missing value keeps the literal `undefined`
    /// marker the remote assistant's prompt was built against; do not tailor
    /// the message.
    fn output_text(self, value: Option<&str>) -> String {
        match self {
            FlightTool::DepartureTime | FlightTool::ArrivalTime => {
                format!("{}: {}", self.label(), value.unwrap_or("undefined"))
            }
            FlightTool::FlightStatus => value.unwrap_or("undefined").to_string(),
        }
    }
}

/// Executes tool-call batches against a flight source, pushing data events
/// into the response stream as they are produced.
pub struct ToolDispatcher<'a> {
    flights: &'a dyn FlightLookup,
    events: mpsc::Sender<StreamFrame>,
}

impl<'a> ToolDispatcher<'a> {
    pub fn new(flights: &'a dyn FlightLookup, events: mpsc::Sender<StreamFrame>) -> Self {
        Self { flights, events }
    }

    /// Dispatches one tool call. An unrecognized name or malformed argument
    /// string is a hard failure; a failed lookup is not (the output then
    /// carries the missing-value marker and no data event is emitted).
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput, DispatchError> {
        let tool = FlightTool::from_name(&call.function.name)
            .ok_or_else(|| DispatchError::UnknownTool(call.function.name.clone()))?;
        let args: Value = serde_json::from_str(&call.function.arguments).map_err(|source| {
            DispatchError::BadArguments {
                tool: tool.name(),
                source,
            }
        })?;
        // Only JSON well-formedness is enforced; a missing flightNumber
        // degrades to an empty lookup key, which resolves to no data.
        let flight_number = args
            .get("flightNumber")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let info = self.flights.lookup(flight_number).await;
        let value = info.as_ref().and_then(|info| tool.select(info));
        if let Some(value) = &value {
            self.emit(tool, value).await;
        }
        Ok(ToolOutput {
            tool_call_id: call.id.clone(),
            output: tool.output_text(value.as_deref()),
        })
    }

    /// Dispatches a whole `requires_action` batch concurrently. Outputs come
    /// back in the order of the incoming calls; the first hard failure aborts
    /// the batch.
    pub async fn dispatch_batch(
        &self,
        calls: &[ToolCall],
    ) -> Result<Vec<ToolOutput>, DispatchError> {
        futures::future::try_join_all(calls.iter().map(|call| self.dispatch(call))).await
    }

    async fn emit(&self, tool: FlightTool, value: &str) {
        let frame = StreamFrame::data(json!({
            "name": tool.event_name(),
            (tool.field_key()): value,
            "description": format!("{}: {}", tool.label(), value),
        }));
        if self.events.send(frame).await.is_err() {
            tracing::warn!(tool = tool.name(), "event receiver closed, dropping data event");
        }
    }
}
