//! HTTP implementation of [`AssistantApi`] against the hosted Assistants v2
//! REST surface (bearer credential + `OpenAI-Beta: assistants=v2`).

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::types::{Run, Thread, ThreadMessage, ToolOutput};
use super::{AssistantApi, AssistantError};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

fn assistant_base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_BASE_URL.to_string())
}

/// Message listing envelope; only the data array is used.
#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

pub struct OpenAiAssistantClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiAssistantClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", assistant_base_url(), path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, AssistantError> {
        let res = builder
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }
        res.json::<T>()
            .await
            .map_err(|e| AssistantError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssistantApi for OpenAiAssistantClient {
    async fn create_thread(&self) -> Result<Thread, AssistantError> {
        Self::send(self.request(Method::POST, "/threads").json(&json!({}))).await
    }

    async fn create_user_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, AssistantError> {
        Self::send(
            self.request(Method::POST, &format!("/threads/{thread_id}/messages"))
                .json(&json!({"role": "user", "content": content})),
        )
        .await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantError> {
        Self::send(
            self.request(Method::POST, &format!("/threads/{thread_id}/runs"))
                .json(&json!({"assistant_id": assistant_id})),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantError> {
        Self::send(self.request(Method::GET, &format!("/threads/{thread_id}/runs/{run_id}")))
            .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AssistantError> {
        Self::send(
            self.request(
                Method::POST,
                &format!("/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            )
            .json(&json!({"tool_outputs": outputs})),
        )
        .await
    }

    async fn list_messages_after(
        &self,
        thread_id: &str,
        after: &str,
    ) -> Result<Vec<ThreadMessage>, AssistantError> {
        let list: MessageList = Self::send(
            self.request(Method::GET, &format!("/threads/{thread_id}/messages"))
                .query(&[("after", after), ("order", "asc")]),
        )
        .await?;
        Ok(list.data)
    }
}
