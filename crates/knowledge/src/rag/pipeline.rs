//! Chat pipeline: screen, retrieve, enrich, generate, fall back.

use crate::rag::generate::GenerationAdapter;
use crate::rag::types::ChatOutcome;
use crate::screener::PromptScreener;
use crate::store::{DocumentStore, Retriever};
use crate::types::Document;
use crate::web_signal::{CannedWebSignal, WebSignalProvider};
use async_trait::async_trait;
use serpico_core::{AppConfig, AppError, AppResult};
use serpico_llm::{create_client, ToolDeclaration};
use serpico_prompt::{PromptSet, APOLOGY_PROMPT, FALLBACK_PROMPT, REJECTION_PROMPT};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Documents retrieved per chat request.
pub const RETRIEVAL_LIMIT: usize = 5;

/// Default upper bound on the web signal call.
pub const DEFAULT_WEB_SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers chat messages. Never fails: every path yields an answer.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn process_chat(&self, message: &str, context: &str) -> ChatOutcome;
}

/// Retrieval-augmented chat over the document store.
pub struct RagPipeline {
    screener: PromptScreener,
    retriever: Arc<dyn Retriever>,
    web_signal: Option<Arc<dyn WebSignalProvider>>,
    web_signal_timeout: Duration,
    generator: GenerationAdapter,
    prompts: Arc<PromptSet>,
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        generator: GenerationAdapter,
        prompts: Arc<PromptSet>,
    ) -> Self {
        Self {
            screener: PromptScreener::new(),
            retriever,
            web_signal: None,
            web_signal_timeout: DEFAULT_WEB_SIGNAL_TIMEOUT,
            generator,
            prompts,
        }
    }

    /// Attach a web signal provider, bounded by `timeout`.
    pub fn with_web_signal(mut self, provider: Arc<dyn WebSignalProvider>, timeout: Duration) -> Self {
        self.web_signal = Some(provider);
        self.web_signal_timeout = timeout;
        self
    }

    /// Wire the pipeline from configuration: backend client, generation
    /// settings, workspace prompts and the canned web signal.
    pub fn from_config(config: &AppConfig, store: Arc<DocumentStore>) -> AppResult<Self> {
        let api_key = config.resolve_api_key();
        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
            Duration::from_secs(config.generation_timeout_secs),
        )
        .map_err(|e| AppError::Config(format!("Failed to create LLM client: {}", e)))?;

        let prompts = Arc::new(PromptSet::load(&config.workspace)?);
        let tools = config
            .tools
            .iter()
            .map(|tool| ToolDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            })
            .collect();
        let generator = GenerationAdapter::new(client, Arc::clone(&prompts), &config.model)
            .with_timeout(Duration::from_secs(config.generation_timeout_secs))
            .with_sampling(config.temperature, config.max_tokens)
            .with_system(config.system_instruction.clone())
            .with_tools(tools);

        let web_signal = CannedWebSignal::new(
            config.web_search,
            Duration::from_millis(config.web_signal_delay_ms),
        );

        Ok(Self::new(store, generator, prompts).with_web_signal(
            Arc::new(web_signal),
            Duration::from_millis(config.web_signal_timeout_ms),
        ))
    }

    async fn fetch_web_signal(&self, message: &str) -> String {
        let Some(provider) = self.web_signal.as_ref().filter(|p| p.is_enabled()) else {
            return String::new();
        };

        match tokio::time::timeout(self.web_signal_timeout, provider.search(message)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!("Web signal {} failed: {}", provider.name(), e);
                String::new()
            }
            Err(_) => {
                tracing::warn!(
                    "Web signal {} timed out after {:?}",
                    provider.name(),
                    self.web_signal_timeout
                );
                String::new()
            }
        }
    }

    fn render_or(&self, id: &str, variables: &HashMap<&str, String>, default: String) -> String {
        self.prompts.render(id, variables).unwrap_or_else(|e| {
            tracing::warn!("Using plain text for {}: {}", id, e);
            default
        })
    }

    fn rejection_answer(&self, reason: &str) -> String {
        let mut variables = HashMap::new();
        variables.insert("reason", reason.to_string());
        self.render_or(
            REJECTION_PROMPT,
            &variables,
            format!("Your message was filtered: {}", reason),
        )
    }

    /// Answer from the best retrieved document, or apologise when there is none.
    fn fallback_answer(&self, documents: &[Document]) -> String {
        match documents.first() {
            Some(top) => {
                let mut variables = HashMap::new();
                variables.insert("content", top.content.clone());
                self.render_or(FALLBACK_PROMPT, &variables, top.content.clone())
            }
            None => self.render_or(
                APOLOGY_PROMPT,
                &HashMap::new(),
                "I'm having trouble processing your request right now.".to_string(),
            ),
        }
    }
}

#[async_trait]
impl ChatService for RagPipeline {
    async fn process_chat(&self, message: &str, context: &str) -> ChatOutcome {
        let verdict = self.screener.screen(message);
        if !verdict.admitted {
            tracing::info!("Prompt rejected: {}", verdict.reason);
            let answer = self.rejection_answer(&verdict.reason);
            return ChatOutcome::rejected(answer, verdict.reason);
        }

        let query = format!("{} {}", message, context);
        let (results, web_signal) = tokio::join!(
            async { self.retriever.retrieve(&query, RETRIEVAL_LIMIT) },
            self.fetch_web_signal(message)
        );

        let documents: Vec<Document> = results.into_iter().map(|r| r.document).collect();
        let sources: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        tracing::info!(
            "Retrieved {} documents, web signal {} chars",
            documents.len(),
            web_signal.len()
        );

        match self.generator.generate(message, &documents, &web_signal).await {
            Ok(answer) => ChatOutcome::generated(answer, sources),
            Err(e) => {
                tracing::warn!("Generation failed, using fallback: {}", e);
                ChatOutcome::fallback(self.fallback_answer(&documents), sources)
            }
        }
    }
}
