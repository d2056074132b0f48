//! Producer task: drive the run and push frames into the response channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use contrail::{drive_to_completion, ToolDispatcher};
use std::sync::Arc;
use stream_frame::StreamFrame;

use crate::app::AppState;
use crate::gateway::GatewayError;

/// Runs the producer and converts a failure into one terminal error frame.
pub(crate) async fn produce(
    state: Arc<AppState>,
    thread_id: String,
    message_id: String,
    tx: mpsc::Sender<StreamFrame>,
    cancel: CancellationToken,
) {
    if let Err(error) = produce_frames(&state, &thread_id, &message_id, &tx, &cancel).await {
        tracing::error!(%thread_id, %error, "assistant stream failed");
        let _ = tx.send(StreamFrame::error(error.to_string())).await;
    }
}

/// Creates the run, drives it to completion (data events flow through `tx`
/// from the dispatcher), then emits one message frame per assistant message
/// created after the watermark, text parts only.
async fn produce_frames(
    state: &AppState,
    thread_id: &str,
    message_id: &str,
    tx: &mpsc::Sender<StreamFrame>,
    cancel: &CancellationToken,
) -> Result<(), GatewayError> {
    let assistant_id = state
        .assistant_id
        .as_deref()
        .ok_or(GatewayError::MissingAssistantId)?;

    let run = state.assistant.create_run(thread_id, assistant_id).await?;
    let dispatcher = ToolDispatcher::new(state.flights.as_ref(), tx.clone());
    drive_to_completion(
        state.assistant.as_ref(),
        &dispatcher,
        run,
        &state.config.poll,
        cancel,
    )
    .await?;

    let messages = state
        .assistant
        .list_messages_after(thread_id, message_id)
        .await?;
    for message in messages.iter().filter(|m| m.role == "assistant") {
        let frame = StreamFrame::message(message.id.clone(), message.text_parts());
        if tx.send(frame).await.is_err() {
            // Receiver gone: the client disconnected mid-stream.
            tracing::warn!(%thread_id, "frame receiver closed, stopping message delivery");
            return Ok(());
        }
    }
    Ok(())
}
