//! Frame types and wire encoding.
//!
//! Each frame serializes to one line `CODE:JSON\n`. Codes match the assistant
//! streaming protocol consumed by the client SDK:
//!
//! - `5` control data `{threadId, messageId}`, first frame of every stream
//! - `4` assistant message `{id, role, content: [text parts]}`
//! - `6` data message `{role: "data", data: {...}}`
//! - `3` error (JSON string), terminates the stream

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stream identifiers sent before any other frame: the resolved thread id and
/// the id of the user message that started this exchange (the watermark).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControlData {
    pub thread_id: String,
    pub message_id: String,
}

/// Text payload of a message content part. `annotations` is passed through
/// untyped; it is omitted from the wire when empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TextValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Value>,
}

impl TextValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            annotations: Vec::new(),
        }
    }
}

/// One content part of an assistant message frame. Only text parts exist on
/// the wire; non-text parts are filtered out before a frame is built.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: TextValue },
}

/// Assistant message frame. `content` may be empty (a message whose parts
/// were all non-text still yields a frame).
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AssistantMessageFrame {
    pub id: String,
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

/// Out-of-band structured payload, emitted before assistant text so the
/// client can progressively render tool results.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DataMessageFrame {
    pub role: &'static str,
    pub data: Value,
}

/// One frame of the response stream.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamFrame {
    ControlData(ControlData),
    Message(AssistantMessageFrame),
    Data(DataMessageFrame),
    Error(String),
}

impl StreamFrame {
    pub fn control(thread_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        StreamFrame::ControlData(ControlData {
            thread_id: thread_id.into(),
            message_id: message_id.into(),
        })
    }

    pub fn message(id: impl Into<String>, content: Vec<ContentPart>) -> Self {
        StreamFrame::Message(AssistantMessageFrame {
            id: id.into(),
            role: "assistant",
            content,
        })
    }

    pub fn data(data: Value) -> Self {
        StreamFrame::Data(DataMessageFrame { role: "data", data })
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamFrame::Error(message.into())
    }

    /// Numeric frame code (the part before `:` on the wire).
    pub fn code(&self) -> u8 {
        match self {
            StreamFrame::Error(_) => 3,
            StreamFrame::Message(_) => 4,
            StreamFrame::ControlData(_) => 5,
            StreamFrame::Data(_) => 6,
        }
    }

    /// Encodes this frame as one wire line `CODE:JSON\n`.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = match self {
            StreamFrame::ControlData(c) => serde_json::to_string(c)?,
            StreamFrame::Message(m) => serde_json::to_string(m)?,
            StreamFrame::Data(d) => serde_json::to_string(d)?,
            StreamFrame::Error(e) => serde_json::to_string(e)?,
        };
        Ok(format!("{}:{}\n", self.code(), json))
    }
}
