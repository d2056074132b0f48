use serde_json::{json, Value};
use std::sync::Arc;

use contrail::assistant::{
    RequiredAction, Run, RunStatus, SubmitToolOutputs, ThreadMessage, ToolCall, ToolCallFunction,
};
use contrail::FlightInfo;

use super::common::{self, frame_lines, run_with, spawn_server, state_with, MockAssistant, MockFlights};

fn status_call_run(flight: &str) -> Run {
    Run {
        required_action: Some(RequiredAction::SubmitToolOutputs {
            submit_tool_outputs: SubmitToolOutputs {
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    function: ToolCallFunction {
                        name: "get_flight_status".to_string(),
                        arguments: format!(r#"{{"flightNumber":"{}"}}"#, flight),
                    },
                }],
            },
        }),
        ..run_with(RunStatus::RequiresAction)
    }
}

fn assistant_reply(id: &str, text: Option<&str>) -> ThreadMessage {
    let content = match text {
        Some(value) => serde_json::from_value(json!([
            {"type": "image_file", "image_file": {"file_id": "file_1"}},
            {"type": "text", "text": {"value": value, "annotations": []}},
        ]))
        .unwrap(),
        None => serde_json::from_value(json!([
            {"type": "image_file", "image_file": {"file_id": "file_2"}},
        ]))
        .unwrap(),
    };
    ThreadMessage {
        id: id.to_string(),
        role: "assistant".to_string(),
        content,
    }
}

#[tokio::test]
async fn status_question_streams_control_data_and_message_frames() {
    common::load_dotenv();
    let assistant = Arc::new(MockAssistant::with_polls(vec![
        run_with(RunStatus::InProgress),
        status_call_run("AA100"),
        run_with(RunStatus::Completed),
    ]));
    assistant
        .submit_results
        .lock()
        .unwrap()
        .push_back(run_with(RunStatus::InProgress));
    *assistant.replies.lock().unwrap() = vec![
        assistant_reply("msg_a1", Some("AA100 has landed.")),
        assistant_reply("msg_a2", None),
    ];
    let flights = MockFlights {
        info: Some(FlightInfo {
            status: Some("landed".to_string()),
            ..FlightInfo::default()
        }),
    };
    let state = state_with(assistant.clone(), flights, Some("asst_1"));
    let (url, _server) = spawn_server(state).await;

    let response = reqwest::Client::new()
        .post(format!("{}/assistant", url))
        .json(&json!({"message": "What's the status of AA100?"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    let body = response.text().await.unwrap();
    eprintln!("[e2e] received:\n{}", body);

    // Control data first: a fresh thread id and the watermark message id.
    let first = body.lines().next().unwrap();
    assert!(first.starts_with("5:"));
    let control: Value = serde_json::from_str(&first[2..]).unwrap();
    assert_eq!(control["threadId"], "thread_new");
    assert_eq!(control["messageId"], "msg_user");
    assert_eq!(
        assistant
            .created_threads
            .load(std::sync::atomic::Ordering::Relaxed),
        1
    );

    // One data frame, emitted before any message frame.
    let data_lines = frame_lines(&body, "6");
    assert_eq!(data_lines.len(), 1);
    let data: Value = serde_json::from_str(&data_lines[0][2..]).unwrap();
    assert_eq!(data["role"], "data");
    assert_eq!(data["data"]["name"], "flight_status");
    assert_eq!(data["data"]["status"], "landed");
    assert_eq!(data["data"]["description"], "Flight status: landed");
    let data_pos = body.find("6:").unwrap();
    let message_pos = body.find("4:").unwrap();
    assert!(data_pos < message_pos);

    // Two message frames: text-only content, and an empty content sequence
    // for the reply whose parts were all non-text.
    let message_lines = frame_lines(&body, "4");
    assert_eq!(message_lines.len(), 2);
    let first_message: Value = serde_json::from_str(&message_lines[0][2..]).unwrap();
    assert_eq!(first_message["id"], "msg_a1");
    assert_eq!(first_message["role"], "assistant");
    assert_eq!(first_message["content"][0]["type"], "text");
    assert_eq!(
        first_message["content"][0]["text"]["value"],
        "AA100 has landed."
    );
    let second_message: Value = serde_json::from_str(&message_lines[1][2..]).unwrap();
    assert_eq!(second_message["content"], json!([]));

    assert!(frame_lines(&body, "3").is_empty());

    // Exactly one submission, echoing the pending tool call id.
    let submissions = assistant.submissions.lock().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].len(), 1);
    assert_eq!(submissions[0][0].tool_call_id, "call_1");
    assert_eq!(submissions[0][0].output, "landed");

    // Listing used the watermark, not the beginning of the thread.
    assert_eq!(
        assistant.listed_after.lock().unwrap().as_slice(),
        [("thread_new".to_string(), "msg_user".to_string())]
    );
}

#[tokio::test]
async fn supplied_thread_id_is_echoed_and_never_replaced() {
    let assistant = Arc::new(MockAssistant::with_polls(vec![run_with(
        RunStatus::Completed,
    )]));
    *assistant.replies.lock().unwrap() = vec![ThreadMessage {
        id: "msg_a1".to_string(),
        role: "assistant".to_string(),
        content: vec![],
    }];
    let state = state_with(assistant.clone(), MockFlights { info: None }, Some("asst_1"));
    let (url, _server) = spawn_server(state).await;

    let body = reqwest::Client::new()
        .post(format!("{}/assistant", url))
        .json(&json!({"threadId": "thread_mine", "message": "and the arrival?"}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    eprintln!("[e2e] received:\n{}", body);

    let control: Value = serde_json::from_str(&body.lines().next().unwrap()[2..]).unwrap();
    assert_eq!(control["threadId"], "thread_mine");
    assert_eq!(
        assistant
            .created_threads
            .load(std::sync::atomic::Ordering::Relaxed),
        0
    );
    assert_eq!(
        assistant.listed_after.lock().unwrap()[0].0,
        "thread_mine".to_string()
    );
}

#[tokio::test]
async fn provider_outage_suppresses_data_frames_but_completes_the_run() {
    let assistant = Arc::new(MockAssistant::with_polls(vec![Run {
        required_action: Some(RequiredAction::SubmitToolOutputs {
            submit_tool_outputs: SubmitToolOutputs {
                tool_calls: vec![ToolCall {
                    id: "call_1".to_string(),
                    function: ToolCallFunction {
                        name: "get_departure_time".to_string(),
                        arguments: r#"{"flightNumber":"AA100"}"#.to_string(),
                    },
                }],
            },
        }),
        ..run_with(RunStatus::RequiresAction)
    }]));
    *assistant.replies.lock().unwrap() = vec![ThreadMessage {
        id: "msg_a1".to_string(),
        role: "assistant".to_string(),
        content: vec![serde_json::from_value(json!(
            {"type": "text", "text": {"value": "I couldn't find departure data.", "annotations": []}}
        ))
        .unwrap()],
    }];
    // The flight source is down: every lookup comes back empty.
    let state = state_with(assistant.clone(), MockFlights { info: None }, Some("asst_1"));
    let (url, _server) = spawn_server(state).await;

    let body = reqwest::Client::new()
        .post(format!("{}/assistant", url))
        .json(&json!({"message": "When does AA100 leave?"}))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    eprintln!("[e2e] received:\n{}", body);

    assert!(frame_lines(&body, "6").is_empty());
    assert!(frame_lines(&body, "3").is_empty());
    assert_eq!(frame_lines(&body, "4").len(), 1);
    let submissions = assistant.submissions.lock().unwrap();
    assert_eq!(submissions[0][0].output, "Departure: undefined");
}
