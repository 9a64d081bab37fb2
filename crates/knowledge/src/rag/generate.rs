//! Answer generation over retrieved documents.

use crate::types::Document;
use serpico_core::{AppError, AppResult};
use serpico_llm::{LlmClient, LlmRequest, ToolDeclaration};
use serpico_prompt::{PromptSet, ANSWER_PROMPT};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Context text used when nothing was retrieved and the web signal is empty.
pub const NO_CONTEXT: &str = "No relevant context found.";

/// Default upper bound on one generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Render the knowledge-base context block for the answer prompt.
///
/// Documents are numbered from 1 in retrieval order. The location line is
/// omitted when a document has none.
pub fn build_context(documents: &[Document], web_signal: &str) -> String {
    if documents.is_empty() && web_signal.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let mut context = String::from("Relevant information:\n\n");
    for (i, document) in documents.iter().enumerate() {
        context.push_str(&format!("[{}] {}\n", i + 1, document.title));
        context.push_str(&format!("Category: {}\n", document.category));
        if let Some(location) = document.location() {
            context.push_str(&format!("Location: {}\n", location));
        }
        context.push_str(&format!("Content: {}\n\n", document.content));
    }
    context
}

/// Turns a question plus context into an answer through an LLM backend.
pub struct GenerationAdapter {
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptSet>,
    model: String,
    timeout: Duration,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    system: Option<String>,
    tools: Vec<ToolDeclaration>,
}

impl GenerationAdapter {
    pub fn new(client: Arc<dyn LlmClient>, prompts: Arc<PromptSet>, model: impl Into<String>) -> Self {
        Self {
            client,
            prompts,
            model: model.into(),
            timeout: DEFAULT_GENERATION_TIMEOUT,
            temperature: None,
            max_tokens: None,
            system: None,
            tools: Vec::new(),
        }
    }

    /// Bound each call; the backend's own timeout may be longer.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sampling settings; `None` leaves the backend default.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system(mut self, system: Option<String>) -> Self {
        self.system = system;
        self
    }

    /// Tool declarations forwarded to the backend on every call.
    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    /// Generate an answer. Every failure comes back as `AppError::Backend`.
    pub async fn generate(
        &self,
        message: &str,
        documents: &[Document],
        web_signal: &str,
    ) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context", build_context(documents, web_signal));
        variables.insert("webSearch", web_signal.to_string());
        variables.insert("message", message.to_string());

        let prompt = self
            .prompts
            .render(ANSWER_PROMPT, &variables)
            .map_err(|e| AppError::Backend(format!("Failed to build prompt: {}", e)))?;

        let request = self.request(prompt);

        tracing::debug!(
            "Generating with {} ({}), {} context documents",
            self.client.provider_name(),
            self.model,
            documents.len()
        );

        let response = tokio::time::timeout(self.timeout, self.client.complete(&request))
            .await
            .map_err(|_| {
                AppError::Backend(format!("Generation timed out after {:?}", self.timeout))
            })?
            .map_err(|e| match e {
                AppError::Backend(_) => e,
                other => AppError::Backend(other.to_string()),
            })?;

        if response.content.trim().is_empty() {
            return Err(AppError::Backend("Backend returned no text".to_string()));
        }

        Ok(response.content)
    }

    fn request(&self, prompt: String) -> LlmRequest {
        let mut request = LlmRequest::new(prompt, &self.model).with_tools(self.tools.clone());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        if let Some(system) = &self.system {
            request = request.with_system(system.clone());
        }
        request
    }
}
