//! Gemini generation provider.
//!
//! Talks to the `models/{model}:generateContent` endpoint of the Google
//! Generative Language API. The request carries the prompt as a single user
//! turn; the first text part found in the candidates is the answer.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage, ToolDeclaration};
use crate::types::ProviderType;
use serde::{Deserialize, Serialize};
use serpico_core::{AppError, AppResult};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<ToolDeclaration>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// First non-empty text part, scanning candidates in order.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .find(|text| !text.is_empty())
    }
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL for the Generative Language API
    base_url: String,

    /// API key; checked at call time, not at construction
    api_key: Option<String>,

    /// HTTP client with the request timeout applied
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        Self::with_base_url(ProviderType::Gemini.default_endpoint(), api_key, timeout)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn to_gemini_request(&self, request: &LlmRequest) -> GenerateContentRequest {
        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![Tool {
                function_declarations: request.tools.clone(),
            }]
        };

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
                role: Some("user".to_string()),
            }],
            tools,
            system_instruction: request.system.as_ref().map(|system| Content {
                parts: vec![Part {
                    text: Some(system.clone()),
                }],
                role: None,
            }),
            generation_config,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Backend("Gemini API key is not configured".to_string())
        })?;

        tracing::info!("Sending generateContent request to Gemini");
        tracing::debug!("Model: {}, prompt bytes: {}", request.model, request.prompt.len());

        let body = self.to_gemini_request(request);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Backend(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse Gemini response: {}", e)))?;

        let content = gemini_response
            .first_text()
            .ok_or_else(|| AppError::Backend("Empty response from Gemini API".to_string()))?
            .to_string();

        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        tracing::info!("Received completion from Gemini");

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.5-flash";

    fn client_for(server: &MockServer, timeout: Duration) -> GeminiClient {
        GeminiClient::with_base_url(server.uri(), Some("test-key".to_string()), timeout).unwrap()
    }

    #[test]
    fn test_request_conversion() {
        let client =
            GeminiClient::with_base_url("http://localhost", None, Duration::from_secs(1)).unwrap();
        let request = LlmRequest::new("Hello", MODEL).with_tools(vec![ToolDeclaration {
            name: "lookup_case".to_string(),
            description: "Look up a case".to_string(),
            parameters: None,
        }]);

        let body = serde_json::to_value(client.to_gemini_request(&request)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "lookup_case"
        );
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_first_text_skips_empty_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{}, {"text": ""}]}},
                {"content": {"parts": [{"text": "second"}, {"text": "third"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("second"));
    }

    #[tokio::test]
    async fn test_complete_returns_first_text_segment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{}:generateContent", MODEL)))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [
                    {"text": "First segment"},
                    {"text": "Second segment"}
                ]}}],
                "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.complete(&LlmRequest::new("Hello", MODEL)).await.unwrap();

        assert_eq!(response.content, "First segment");
        assert_eq!(response.usage.total_tokens, 10);
    }

    #[tokio::test]
    async fn test_huge_usage_counts_do_not_overflow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
                "usageMetadata": {"promptTokenCount": u32::MAX, "candidatesTokenCount": 1}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let response = client.complete(&LlmRequest::new("Hello", MODEL)).await.unwrap();

        assert_eq!(response.content, "ok");
        assert_eq!(response.usage.prompt_tokens, u32::MAX);
        assert_eq!(response.usage.total_tokens, u32::MAX);
    }

    #[tokio::test]
    async fn test_non_success_status_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .complete(&LlmRequest::new("Hello", MODEL))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .complete(&LlmRequest::new("Hello", MODEL))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("parse"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client
            .complete(&LlmRequest::new("Hello", MODEL))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("Empty response"));
    }

    #[tokio::test]
    async fn test_timeout_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(50));
        let err = client
            .complete(&LlmRequest::new("Hello", MODEL))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("Failed to send request"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_at_call_time() {
        let client =
            GeminiClient::with_base_url("http://127.0.0.1:9", None, Duration::from_secs(1))
                .unwrap();
        let err = client
            .complete(&LlmRequest::new("Hello", MODEL))
            .await
            .unwrap_err();

        assert!(err.is_backend());
        assert!(err.to_string().contains("API key"));
    }
}
