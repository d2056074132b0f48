//! Remote assistant/thread service boundary.
//!
//! [`AssistantApi`] is the seam the orchestrator and gateway are written
//! against; [`OpenAiAssistantClient`] is the HTTP implementation. Tests supply
//! scripted implementations instead.

mod http;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use http::OpenAiAssistantClient;
pub use types::{
    MessageContentPart, RequiredAction, Run, RunStatus, SubmitToolOutputs, Thread, ThreadMessage,
    ToolCall, ToolCallFunction, ToolOutput,
};

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("assistant transport: {0}")]
    Transport(String),
    #[error("assistant API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("assistant response decode: {0}")]
    Decode(String),
}

/// Operations the core needs from the remote thread/run service.
///
/// Every call is one remote round trip; the service owns all state behind
/// these handles. Failures are returned, never retried here.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Creates an empty thread and returns its handle.
    async fn create_thread(&self) -> Result<Thread, AssistantError>;

    /// Appends a user message to the thread; the returned id is the watermark.
    async fn create_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, AssistantError>;

    /// Starts a run of `assistant_id` against the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<Run, AssistantError>;

    /// Re-reads the run's current state (one polling step).
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError>;

    /// Submits the batch of tool outputs for the run's pending tool calls and
    /// returns the updated run.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AssistantError>;

    /// Lists messages created strictly after `after`, in ascending creation
    /// order. Never returns the watermark message itself.
    async fn list_messages_after(
        &self,
        thread_id: &str,
        after: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError>;
}
