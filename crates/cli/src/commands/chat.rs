//! Chat command handler.
//!
//! Runs one message through the retrieval-augmented chat pipeline.

use super::print_json;
use clap::Args;
use serpico_core::{config::AppConfig, AppResult};
use serpico_knowledge::{ChatService, ChatStatus, DocumentStore, RagPipeline};
use std::sync::Arc;

/// Ask a question answered from the document store
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// The message to answer
    pub message: String,

    /// Extra context appended to the retrieval query
    #[arg(long, default_value = "")]
    pub context: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let store = Arc::new(DocumentStore::load(&config.data_dir())?);
        let pipeline = RagPipeline::from_config(config, store)?;

        let outcome = pipeline.process_chat(&self.message, &self.context).await;

        tracing::debug!(
            "Chat outcome: status={:?}, sources={}",
            outcome.status,
            outcome.sources.len()
        );

        if self.json {
            return print_json(&outcome);
        }

        println!("{}", outcome.answer);

        match &outcome.status {
            ChatStatus::Rejected { .. } => {}
            _ if outcome.sources.is_empty() => {
                println!();
                println!("Sources: (no sources available)");
            }
            _ => {
                println!();
                println!("Sources: {}", outcome.sources.join(", "));
            }
        }

        Ok(())
    }
}
