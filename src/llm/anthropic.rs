//! Anthropic Messages API client
//!
//! `POST {base}/v1/messages` with the key in `x-api-key`. The request carries
//! the model, an output token bound, the sampling temperature and a single
//! user message; the reply's first `text` content block is the completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Completion, LlmBackend, LlmError};
use crate::config::{defaults, AppConfig};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

/// `{"type": "error", "error": {"type": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the Anthropic Messages API
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl AnthropicClient {
    pub fn new(http: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            http,
            api_url: config.anthropic_api_url.trim_end_matches('/').to_string(),
            api_key: config.anthropic_api_key.clone(),
            model: config.anthropic_model.clone(),
            max_tokens: defaults::MAX_OUTPUT_TOKENS,
            temperature: defaults::TEMPERATURE,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmBackend for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::ConfigMissing("ANTHROPIC_API_KEY"))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        info!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let resp = self
            .http
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", defaults::ANTHROPIC_API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(LlmError::Provider { status, message });
        }

        let parsed: MessagesResponse = serde_json::from_slice(&bytes)?;
        debug!(blocks = parsed.content.len(), "Completion received");

        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(LlmError::EmptyResponse)?;

        let usage = parsed.usage.unwrap_or(Usage {
            input_tokens: None,
            output_tokens: None,
        });

        Ok(Completion {
            text,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        })
    }

    fn backend_name(&self) -> &'static str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base: &str, api_key: Option<&str>) -> AnthropicClient {
        let config = AppConfig {
            anthropic_api_url: base.to_string(),
            anthropic_api_key: api_key.map(str::to_string),
            ..AppConfig::default()
        };
        AnthropicClient::new(reqwest::Client::new(), &config)
    }

    /// Echoes the request back inside the completion so tests can inspect it.
    async fn echo_messages(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        let key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let version = headers
            .get("anthropic-version")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let echo = json!({ "key": key, "version": version, "body": body });

        Json(json!({
            "id": "msg_test",
            "type": "message",
            "model": body["model"],
            "content": [{ "type": "text", "text": echo.to_string() }],
            "usage": { "input_tokens": 12, "output_tokens": 34 }
        }))
    }

    #[tokio::test]
    async fn sends_model_limits_and_prompt() {
        let base = spawn_server(Router::new().route("/v1/messages", post(echo_messages))).await;
        let client = client_for(&base, Some("sk-test"));

        let completion = client.complete("Analyse gold").await.unwrap();
        let echo: Value = serde_json::from_str(&completion.text).unwrap();

        assert_eq!(echo["key"], "sk-test");
        assert_eq!(echo["version"], defaults::ANTHROPIC_API_VERSION);
        assert_eq!(echo["body"]["model"], defaults::ANTHROPIC_MODEL);
        assert_eq!(echo["body"]["max_tokens"], 4000);
        assert_eq!(echo["body"]["temperature"], 0.1);
        assert_eq!(echo["body"]["messages"][0]["role"], "user");
        assert_eq!(echo["body"]["messages"][0]["content"], "Analyse gold");

        assert_eq!(completion.model, defaults::ANTHROPIC_MODEL);
        assert_eq!(completion.input_tokens, Some(12));
        assert_eq!(completion.output_tokens, Some(34));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        // Nothing listens here; reaching the network would be a Network error.
        let client = client_for("http://127.0.0.1:1", None);
        assert!(matches!(
            client.complete("hi").await,
            Err(LlmError::ConfigMissing("ANTHROPIC_API_KEY"))
        ));
    }

    #[tokio::test]
    async fn provider_error_message_is_surfaced() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "type": "error",
                        "error": { "type": "authentication_error", "message": "invalid x-api-key" }
                    })),
                )
            }),
        );
        let base = spawn_server(app).await;

        match client_for(&base, Some("bad")).complete("hi").await {
            Err(LlmError::Provider { status, message }) => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(message, "invalid x-api-key");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_without_text_block_is_empty() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { Json(json!({ "content": [], "model": "m" })) }),
        );
        let base = spawn_server(app).await;

        assert!(matches!(
            client_for(&base, Some("k")).complete("hi").await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(matches!(
            client_for(&format!("http://{addr}"), Some("k")).complete("hi").await,
            Err(LlmError::Network(_))
        ));
    }
}
