use serde_json::json;
use std::sync::Arc;

use contrail::assistant::RunStatus;

use super::common::{frame_lines, run_with, spawn_server, state_with, MockAssistant, MockFlights};

#[tokio::test]
async fn terminal_run_status_ends_the_stream_with_one_error_frame() {
    let assistant = Arc::new(MockAssistant::with_polls(vec![run_with(RunStatus::Failed)]));
    let state = state_with(assistant.clone(), MockFlights { info: None }, Some("asst_1"));
    let (url, _server) = spawn_server(state).await;

    let response = reqwest::Client::new()
        .post(format!("{}/assistant", url))
        .json(&json!({"message": "status of AA100?"}))
        .send()
        .await
        .unwrap();
    // The stream was already open when the run failed: HTTP status stays
    // success, the failure arrives in-band.
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    eprintln!("[e2e] received:\n{}", body);

    assert!(body.lines().next().unwrap().starts_with("5:"));
    let errors = frame_lines(&body, "3");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("failed"));
    assert!(frame_lines(&body, "4").is_empty());
    assert!(frame_lines(&body, "6").is_empty());
    assert!(assistant.submissions.lock().unwrap().is_empty());
    assert!(assistant.listed_after.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_assistant_identity_fails_before_any_run_is_created() {
    let assistant = Arc::new(MockAssistant::default());
    let state = state_with(assistant.clone(), MockFlights { info: None }, None);
    let (url, _server) = spawn_server(state).await;

    let body = reqwest::Client::new()
        .post(format!("{}/assistant", url))
        .json(&json!({"message": "status of AA100?"}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    eprintln!("[e2e] received:\n{}", body);

    let errors = frame_lines(&body, "3");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("OPENAI_ASSISTANT_ID is not set"));
    assert_eq!(
        assistant
            .created_runs
            .load(std::sync::atomic::Ordering::Relaxed),
        0
    );
}
