//! # Contrail
//!
//! Core of the flight-assistant service: drive a remote assistant run to
//! completion, executing flight-lookup tool calls when the run pauses for
//! action, and emit data events for progressive rendering.
//!
//! ## Main modules
//!
//! - [`assistant`]: [`AssistantApi`] trait and the HTTP client for the remote
//!   thread/run service; wire DTOs ([`Run`], [`RunStatus`], [`ThreadMessage`]).
//! - [`flight`]: [`FlightLookup`] trait, [`FlightInfo`], and the aviationstack
//!   HTTP client (failures collapse to "no data", never an error).
//! - [`tools`]: [`FlightTool`] dispatch: tool-call batches to tool outputs
//!   plus out-of-band data events.
//! - [`run`]: [`drive_to_completion`], the polling state machine over the run
//!   lifecycle, with deadline, cancellation, and capped backoff.

pub mod assistant;
pub mod flight;
pub mod run;
pub mod tools;

pub use assistant::{
    AssistantApi, AssistantError, OpenAiAssistantClient, RequiredAction, Run, RunStatus, Thread,
    ThreadMessage, ToolCall, ToolOutput,
};
pub use flight::{AviationstackClient, FlightInfo, FlightLookup};
pub use run::{drive_to_completion, poll_policy_from_env, PollPolicy, RunError};
pub use tools::{DispatchError, FlightTool, ToolDispatcher};
