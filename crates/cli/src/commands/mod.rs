//! Command handlers for the Serpico CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod chat;
pub mod docs;
pub mod prompts;
pub mod screen;

// Re-export command types for convenience
pub use chat::ChatCommand;
pub use docs::DocsCommand;
pub use prompts::PromptsCommand;
pub use screen::ScreenCommand;

use serde::Serialize;
use serpico_core::AppResult;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
