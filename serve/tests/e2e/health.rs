use std::sync::Arc;

use super::common::{spawn_server, state_with, MockAssistant, MockFlights};

#[tokio::test]
async fn health_answers_ok() {
    let state = state_with(
        Arc::new(MockAssistant::default()),
        MockFlights { info: None },
        Some("asst_1"),
    );
    let (url, _server) = spawn_server(state).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}
