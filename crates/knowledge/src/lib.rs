//! Serpico knowledge system.
//!
//! A small JSON-backed document store with lexical search, a rule-based
//! prompt screener, a canned web signal, and the chat pipeline that ties
//! them to a generation backend.

pub mod rag;
pub mod scoring;
pub mod screener;
pub mod seed;
pub mod store;
pub mod types;
pub mod web_signal;


// Re-export commonly used types
pub use rag::{ChatOutcome, ChatService, ChatStatus, GenerationAdapter, RagPipeline};
pub use screener::{PromptScreener, ScreeningVerdict};
pub use store::{DocumentStore, Retriever};
pub use types::{Document, ScoredDocument, StoreStats};
pub use web_signal::{CannedWebSignal, WebSignalProvider};
