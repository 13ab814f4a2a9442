use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::config::CompletionConfig;
use crate::message::errors::CompletionError;
use crate::message::ports::CompletionClient;

/// Chat-completions client for OpenAI compatible endpoints.
pub struct OpenAiCompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

impl OpenAiCompletionClient {
    /// Build a client from configuration.
    ///
    /// An empty API key is accepted here; `complete` then fails with
    /// `MissingApiKey`.
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, user_text: &str) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: user_text,
            }],
        };

        tracing::debug!(model = %self.model, "Sending completion request");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::UnexpectedStatus(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Json;
    use axum::Router;
    use serde_json::json;
    use serde_json::Value;

    use super::*;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind upstream listener");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}/v1/chat/completions", addr)
    }

    fn completion_config(api_url: String, api_key: &str) -> CompletionConfig {
        CompletionConfig {
            api_url,
            api_key: api_key.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer test-key");
                let well_formed = body["model"] == "gpt-3.5-turbo"
                    && body["messages"][0]["role"] == "user"
                    && body["messages"][0]["content"] == "hello";

                if !(authorized && well_formed) {
                    return (StatusCode::BAD_REQUEST, Json(json!({})));
                }

                (
                    StatusCode::OK,
                    Json(json!({
                        "choices": [
                            {"message": {"role": "assistant", "content": "hi there"}},
                            {"message": {"role": "assistant", "content": "ignored"}}
                        ]
                    })),
                )
            }),
        );
        let url = spawn_upstream(router).await;
        let client = OpenAiCompletionClient::new(&completion_config(url, "test-key")).unwrap();

        let reply = client.complete("hello").await.unwrap();

        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_complete_non_success_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, Json(json!({"error": "slow down"}))) }),
        );
        let url = spawn_upstream(router).await;
        let client = OpenAiCompletionClient::new(&completion_config(url, "test-key")).unwrap();

        let result = client.complete("hello").await;

        assert_eq!(result, Err(CompletionError::UnexpectedStatus(429)));
    }

    #[tokio::test]
    async fn test_complete_without_choices() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let url = spawn_upstream(router).await;
        let client = OpenAiCompletionClient::new(&completion_config(url, "test-key")).unwrap();

        let result = client.complete("hello").await;

        assert_eq!(result, Err(CompletionError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_complete_without_api_key() {
        let client =
            OpenAiCompletionClient::new(&completion_config("http://127.0.0.1:9/".to_string(), "")).unwrap();

        let result = client.complete("hello").await;

        assert_eq!(result, Err(CompletionError::MissingApiKey));
    }
}
