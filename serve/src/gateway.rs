//! Handle `POST /assistant`: resolve thread, post the user message, stream
//! the run's frames.
//!
//! Flow: resolve thread (create when absent) → post user message (watermark)
//! → send control frame → spawn producer task → stream frames as the body.
//! Failures before streaming begins surface as HTTP 500; once the stream is
//! open, a producer failure becomes one error frame and the stream ends.

use axum::{
    body::{Body, Bytes},
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use contrail::{AssistantError, RunError};
use stream_frame::StreamFrame;

use crate::app::AppState;
use crate::producer;

/// Request body. `threadId` is optional: absent means "start a new
/// conversation"; present means "continue this one" and is echoed verbatim.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssistantRequest {
    #[serde(default)]
    pub(crate) thread_id: Option<String>,
    pub(crate) message: String,
}

#[derive(Error, Debug)]
pub(crate) enum GatewayError {
    #[error("OPENAI_ASSISTANT_ID is not set")]
    MissingAssistantId,
    #[error(transparent)]
    Assistant(#[from] AssistantError),
    #[error(transparent)]
    Run(#[from] RunError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "assistant request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub(crate) async fn handle_assistant(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssistantRequest>,
) -> Result<Response, GatewayError> {
    let request_id = Uuid::new_v4();

    let thread_id = match request.thread_id {
        Some(id) => id,
        None => state.assistant.create_thread().await?.id,
    };
    let message_id = state
        .assistant
        .create_user_message(&thread_id, &request.message)
        .await?
        .id;
    tracing::info!(%request_id, %thread_id, %message_id, "starting assistant run");

    let (tx, rx) = mpsc::channel::<StreamFrame>(state.config.frame_queue_capacity);
    let _ = tx
        .send(StreamFrame::control(
            thread_id.as_str(),
            message_id.as_str(),
        ))
        .await;

    let cancel = CancellationToken::new();
    tokio::spawn(producer::produce(
        state,
        thread_id,
        message_id,
        tx,
        cancel.clone(),
    ));

    // Dropping the body (client disconnected) drops the guard, which cancels
    // the run task at its next suspension point.
    let guard = cancel.drop_guard();
    let body = Body::from_stream(ReceiverStream::new(rx).map(move |frame| {
        let _ = &guard;
        frame
            .encode()
            .map(Bytes::from)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}
