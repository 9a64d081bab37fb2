//! Generation provider factory.
//!
//! Resolves a provider name from configuration into a ready `LlmClient`.
//! Missing credentials are not an error here; Gemini reports them when it
//! is first called so the application can start without a key.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Create a generation client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - Optional API key (Gemini only)
/// * `timeout` - Upper bound on each generation call
///
/// # Errors
/// Returns an error message if the provider is unknown or the HTTP client
/// cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;
    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());

    tracing::debug!("Creating {} client for {}", provider_type.as_str(), base_url);

    match provider_type {
        ProviderType::Gemini => {
            if api_key.is_none() {
                tracing::warn!("No Gemini API key configured; generation will fall back");
            }
            let client =
                GeminiClient::with_base_url(base_url, api_key.map(str::to_string), timeout)
                    .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let client = OllamaClient::with_base_url(base_url, timeout).map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn test_create_gemini_client_without_key() {
        let client = create_client("gemini", None, None, TIMEOUT).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("ollama", Some("http://localhost:8080"), None, TIMEOUT).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None, TIMEOUT) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
