//! Assistant stream protocol: typed frames and their numbered line encoding.
//!
//! The gateway's streaming response body is a sequence of `CODE:JSON\n` lines
//! that the presentation shell decodes incrementally: control data first, then
//! data messages interleaved with assistant messages in emission order.

mod frame;

pub use frame::{
    AssistantMessageFrame, ContentPart, ControlData, DataMessageFrame, StreamFrame, TextValue,
};
