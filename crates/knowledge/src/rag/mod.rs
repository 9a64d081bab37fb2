//! Retrieval-augmented chat.
//!
//! Screens the prompt, gathers store documents and web context together,
//! asks the generation backend and falls back to stored text when it fails.

pub mod generate;
pub mod pipeline;
pub mod types;

pub use generate::{build_context, GenerationAdapter};
pub use pipeline::{ChatService, RagPipeline, RETRIEVAL_LIMIT};
pub use types::{ChatOutcome, ChatStatus};
