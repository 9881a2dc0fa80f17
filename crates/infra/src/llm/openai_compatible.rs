//! OpenAI-compatible chat completions client.
//!
//! Works with any server exposing `POST {base_url}/chat/completions`
//! (OpenAI, Ollama, vLLM, LocalAI). Configured through
//! [`GatewayConfig`](crate::config::GatewayConfig).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use agencyos_ai::gateway::usable_text;
use agencyos_ai::{GatewayError, ModelGateway, PromptMessage, PromptTranscript};

use crate::config::{ConfigError, GatewayConfig};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// [`ModelGateway`] backed by an OpenAI-compatible HTTP API.
///
/// One request per call; never retries.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGateway {
    client: Client,
    config: GatewayConfig,
}

impl OpenAiCompatibleGateway {
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() {
            GatewayError::upstream(format!("cannot connect to {}", self.config.base_url))
        } else {
            GatewayError::upstream(format!("request failed: {e}"))
        }
    }

    /// Prefer the provider's own message; fall back to status + raw body.
    fn status_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => GatewayError::upstream(format!("{status}: {}", parsed.error.message)),
            Err(_) if body.trim().is_empty() => GatewayError::upstream(status.to_string()),
            Err(_) => GatewayError::upstream(format!("{status}: {}", body.trim())),
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiCompatibleGateway {
    #[instrument(skip_all, fields(model = %self.config.model, messages = transcript.len()))]
    async fn invoke(&self, transcript: &PromptTranscript) -> Result<String, GatewayError> {
        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages: transcript.messages(),
        };

        let request = self.client.post(self.api_url("chat/completions")).json(&payload);
        let response = self.add_auth_header(request).send().await.map_err(|e| {
            error!(error = %e, "model request failed");
            self.transport_error(&e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "failed to read model response");
            self.transport_error(&e)
        })?;

        if !status.is_success() {
            error!(%status, "model provider returned an error status");
            return Err(Self::status_error(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "failed to decode model response");
            GatewayError::upstream(format!("undecodable response: {e}"))
        })?;

        let content = parsed.choices.into_iter().next().and_then(|c| c.message.content);
        let text = usable_text(content)?;
        debug!(chars = text.len(), "model response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer, api_key: Option<&str>) -> OpenAiCompatibleGateway {
        OpenAiCompatibleGateway::new(GatewayConfig {
            base_url: format!("{}/v1/", server.uri()),
            api_key: api_key.map(str::to_owned),
            model: "test-model".to_owned(),
            timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    fn transcript() -> PromptTranscript {
        [
            PromptMessage::system("You are a helpful assistant."),
            PromptMessage::user("Hello"),
        ]
        .into_iter()
        .collect()
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn posts_transcript_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant." },
                    { "role": "user", "content": "Hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there".into())))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server, Some("sk-test")).invoke(&transcript()).await.unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn error_status_is_upstream_with_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": { "message": "model overloaded", "type": "server_error" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = gateway(&server, None).invoke(&transcript()).await.unwrap_err();
        match err {
            GatewayError::Upstream(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("model overloaded"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_text_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = gateway(&server, None).invoke(&transcript()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn missing_or_blank_content_is_empty_response() {
        for body in [
            completion(serde_json::Value::Null),
            completion("   \n".into()),
            serde_json::json!({ "choices": [] }),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;

            let err = gateway(&server, None).invoke(&transcript()).await.unwrap_err();
            assert_eq!(err, GatewayError::EmptyResponse);
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = gateway(&server, None).invoke(&transcript()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late".into()))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = gateway(&server, None).invoke(&transcript()).await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
    }

    #[tokio::test]
    async fn unreachable_provider_is_upstream() {
        let gateway = OpenAiCompatibleGateway::new(GatewayConfig {
            base_url: "http://127.0.0.1:9".to_owned(),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            ..GatewayConfig::default()
        })
        .unwrap();

        let err = gateway.invoke(&transcript()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(_) | GatewayError::Timeout));
    }
}
