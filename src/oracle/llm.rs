use crate::config::OracleConfig;
use crate::oracle::prompt::{build_selection_prompt, parse_selection, SYSTEM_PROMPT};
use crate::oracle::traits::{OracleError, RelevanceOracle, RelevanceRequest};
use crate::ConfigError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Oracle backed by an OpenAI-compatible chat-completions endpoint
pub struct LlmOracle {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl LlmOracle {
    /// Creates an oracle using an explicit API key
    pub fn new(config: &OracleConfig, api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: api_key.into(),
        })
    }

    /// Creates an oracle reading the API key from `config.api_key_env`
    pub fn from_env(config: &OracleConfig) -> Result<Self, ConfigError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "environment variable {} must hold the oracle API key",
                    config.api_key_env
                ))
            })?;

        Self::new(config, api_key)
            .map_err(|e| ConfigError::Validation(format!("failed to build oracle client: {}", e)))
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Request(format!("failed to decode response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or(OracleError::EmptyResponse)
    }
}

#[async_trait]
impl RelevanceOracle for LlmOracle {
    async fn select(&self, request: &RelevanceRequest<'_>) -> Result<Vec<usize>, OracleError> {
        if request.candidates.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_selection_prompt(request);
        let answer = self.complete(&prompt).await?;
        tracing::debug!(page = %request.page_url, answer = %answer.trim(), "Oracle answered");

        parse_selection(&answer)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::traits::Candidate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidates() -> Vec<Candidate> {
        (0..4)
            .map(|i| Candidate {
                index: i,
                url: format!("https://example.test/{}", i),
                text: format!("Link {}", i),
            })
            .collect()
    }

    fn oracle_for(server: &MockServer) -> LlmOracle {
        let config = OracleConfig {
            endpoint: format!("{}/v1/chat/completions", server.uri()),
            request_timeout_secs: 5,
            ..OracleConfig::default()
        };
        LlmOracle::new(&config, "test-key").unwrap()
    }

    fn answer(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }))
    }

    #[tokio::test]
    async fn test_select_parses_indices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(answer("3,0"))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = candidates();
        let request = RelevanceRequest {
            topic: "testing",
            page_url: "https://example.test/",
            preview: "preview",
            candidates: &candidates,
        };

        let selected = oracle_for(&server).select(&request).await.unwrap();
        assert_eq!(selected, vec![3, 0]);
    }

    #[tokio::test]
    async fn test_select_malformed_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(answer("The best links are the guides."))
            .mount(&server)
            .await;

        let candidates = candidates();
        let request = RelevanceRequest {
            topic: "testing",
            page_url: "https://example.test/",
            preview: "",
            candidates: &candidates,
        };

        let err = oracle_for(&server).select(&request).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_selection");
    }

    #[tokio::test]
    async fn test_select_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let candidates = candidates();
        let request = RelevanceRequest {
            topic: "testing",
            page_url: "https://example.test/",
            preview: "",
            candidates: &candidates,
        };

        let err = oracle_for(&server).select(&request).await.unwrap_err();
        assert!(matches!(err, OracleError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_select_without_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let candidates = candidates();
        let request = RelevanceRequest {
            topic: "testing",
            page_url: "https://example.test/",
            preview: "",
            candidates: &candidates,
        };

        let err = oracle_for(&server).select(&request).await.unwrap_err();
        assert!(matches!(err, OracleError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_no_candidates_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(answer("0"))
            .expect(0)
            .mount(&server)
            .await;

        let request = RelevanceRequest {
            topic: "testing",
            page_url: "https://example.test/",
            preview: "",
            candidates: &[],
        };

        assert!(oracle_for(&server).select(&request).await.unwrap().is_empty());
    }

    #[test]
    fn test_from_env_missing_key() {
        let config = OracleConfig {
            api_key_env: "TOPIC_CRAWLER_TEST_KEY_THAT_IS_NOT_SET".to_string(),
            ..OracleConfig::default()
        };
        assert!(matches!(
            LlmOracle::from_env(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
