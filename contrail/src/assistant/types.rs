//! Remote thread/run service DTOs.
//!
//! Field names match the hosted Assistants REST API; everything here is an
//! opaque handle or a read-only snapshot owned by the remote service.

use serde::{Deserialize, Serialize};
use stream_frame::{ContentPart, TextValue};

/// Remote-owned durable message sequence. The core only carries its id.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// One message of a thread. The id of the posted user message is the
/// watermark separating prior history from newly produced messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContentPart>,
}

impl ThreadMessage {
    /// The text-bearing subsequence of this message's content parts, in order.
    /// Non-text parts (images etc.) are dropped, not surfaced.
    pub fn text_parts(&self) -> Vec<ContentPart> {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContentPart::Text { text } => Some(ContentPart::Text { text: text.clone() }),
                MessageContentPart::Other => None,
            })
            .collect()
    }
}

/// Inbound message content part. Unknown part types (image_file, image_url,
/// ...) deserialize to [`MessageContentPart::Other`] instead of failing the
/// whole listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContentPart {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

/// One execution attempt of the assistant against a thread.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
}

/// Run lifecycle status. The remote service may grow statuses this build does
/// not know; those land in `Other` and the orchestrator treats them as
/// terminal failures rather than polling forever.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Cancelling,
    Cancelled,
    Failed,
    Expired,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Completed => "completed",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Expired => "expired",
            RunStatus::Other(s) => s.as_str(),
        };
        f.write_str(name)
    }
}

/// What a paused run wants from the caller. Only the submit-tool-outputs kind
/// carries local work; other kinds deserialize to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCall>,
}

/// A pending tool call emitted by the remote run. Its id must be echoed back
/// in the matching [`ToolOutput`].
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallFunction {
    /// Wire tool name, e.g. `get_flight_status`.
    pub name: String,
    /// JSON-encoded argument string, parsed by the dispatcher.
    pub arguments: String,
}

/// Pairing of a tool-call id and its textual result, submitted as a batch
/// matching exactly the pending tool calls of one polling cycle.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}
