//! Generation backend integration for Serpico.
//!
//! This crate provides a provider-agnostic abstraction over text generation
//! backends. A caller builds an [`LlmRequest`], hands it to an [`LlmClient`]
//! and gets back the generated text or an `AppError::Backend`.
//!
//! # Providers
//! - **Gemini**: Google `generateContent` REST API (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use serpico_llm::{LlmClient, LlmRequest, providers::GeminiClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(Some("api-key".to_string()), Duration::from_secs(30))?;
//! let request = LlmRequest::new("What is the pursuit success rate?", "gemini-2.5-flash");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage, ToolDeclaration};
pub use factory::create_client;
pub use providers::{GeminiClient, OllamaClient};
pub use types::ProviderType;
