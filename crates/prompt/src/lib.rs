//! Prompt system for Serpico.
//!
//! Every user-facing or backend-facing text template lives here:
//! - YAML-based prompt definitions, shipped as built-ins
//! - Per-workspace overrides in `.serpico/prompts/<id>.yml`
//! - Handlebars rendering with HTML escaping disabled

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::PromptSet;
pub use builtin::{ANSWER_PROMPT, APOLOGY_PROMPT, FALLBACK_PROMPT, REJECTION_PROMPT};
pub use loader::{list_prompts, load_prompt, PromptOrigin};
pub use types::PromptDefinition;
