//! Run lifecycle orchestration.
//!
//! [`drive_to_completion`] owns the polling loop over a remote run: wait while
//! the run is queued or in progress, execute pending tool calls when it pauses
//! for action, and stop on a terminal status. The caller's deadline and
//! cancellation token are honored at every suspension point (the poll sleep
//! and each remote round trip).

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::assistant::{AssistantApi, AssistantError, RequiredAction, Run, RunStatus};
use crate::tools::{DispatchError, ToolDispatcher};

/// Polling knobs. The interval starts at `initial`, doubles after every
/// refresh up to `max`, and resets after a tool-output submission (the run is
/// active again). `deadline` bounds the whole drive.
#[derive(Clone, Debug)]
pub struct PollPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(5),
            deadline: None,
        }
    }
}

fn env_ms(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
}

/// Builds a [`PollPolicy`] from environment variables, falling back to
/// [`Default`] for unset or invalid values.
///
/// - `RUN_POLL_INITIAL_MS` (default 500)
/// - `RUN_POLL_MAX_MS` (default 5000)
/// - `RUN_DEADLINE_MS` (default unset: no deadline)
pub fn poll_policy_from_env() -> PollPolicy {
    let default = PollPolicy::default();
    PollPolicy {
        initial: env_ms("RUN_POLL_INITIAL_MS").unwrap_or(default.initial),
        max: env_ms("RUN_POLL_MAX_MS").unwrap_or(default.max),
        deadline: env_ms("RUN_DEADLINE_MS").or(default.deadline),
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("run ended with status {0}")]
    Terminal(RunStatus),
    #[error("run did not finish within the deadline")]
    DeadlineExceeded,
    #[error("run cancelled")]
    Cancelled,
    #[error(transparent)]
    Api(#[from] AssistantError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Races a remote call against cancellation.
async fn with_cancel<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, AssistantError>>,
) -> Result<T, RunError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(RunError::Cancelled),
        result = call => result.map_err(RunError::from),
    }
}

/// Sleeps one poll interval, capped at the deadline. Returns
/// [`RunError::DeadlineExceeded`] once the deadline is reached and
/// [`RunError::Cancelled`] when the token fires mid-sleep.
async fn wait_for_next_poll(
    interval: Duration,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
) -> Result<(), RunError> {
    let wake = Instant::now() + interval;
    let wake = deadline.map_or(wake, |d| wake.min(d));
    tokio::select! {
        _ = cancel.cancelled() => return Err(RunError::Cancelled),
        _ = tokio::time::sleep_until(wake) => {}
    }
    if deadline.is_some_and(|d| Instant::now() >= d) {
        return Err(RunError::DeadlineExceeded);
    }
    Ok(())
}

/// Drives `run` until it completes.
///
/// Success is returning without error; the only observable side effects are
/// the poll sleeps, the remote retrieve/submit calls, and the data events the
/// dispatcher emits. A failure-class terminal status, a dispatch failure, the
/// deadline, or cancellation abort the drive.
pub async fn drive_to_completion(
    api: &dyn AssistantApi,
    dispatcher: &ToolDispatcher<'_>,
    mut run: Run,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<(), RunError> {
    let deadline = policy.deadline.map(|d| Instant::now() + d);
    let mut interval = policy.initial;
    loop {
        match run.status {
            RunStatus::Queued | RunStatus::InProgress => {
                wait_for_next_poll(interval, deadline, cancel).await?;
                let next = with_cancel(cancel, api.retrieve_run(&run.thread_id, &run.id)).await?;
                tracing::debug!(run_id = %run.id, status = %next.status, "run refreshed");
                interval = (interval * 2).min(policy.max);
                run = next;
            }
            RunStatus::RequiresAction => {
                let Some(RequiredAction::SubmitToolOutputs { submit_tool_outputs }) =
                    run.required_action.take()
                else {
                    // Action kinds other than submit-tool-outputs carry no
                    // local work; the wait ends here.
                    return Ok(());
                };
                let outputs = dispatcher
                    .dispatch_batch(&submit_tool_outputs.tool_calls)
                    .await?;
                tracing::debug!(
                    run_id = %run.id,
                    outputs = outputs.len(),
                    "submitting tool outputs"
                );
                let next = with_cancel(
                    cancel,
                    api.submit_tool_outputs(&run.thread_id, &run.id, &outputs),
                )
                .await?;
                interval = policy.initial;
                run = next;
            }
            RunStatus::Completed => return Ok(()),
            ref status => return Err(RunError::Terminal(status.clone())),
        }
    }
}
