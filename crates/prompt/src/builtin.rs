//! Built-in prompt definitions compiled into the binary.

use crate::types::PromptDefinition;
use serpico_core::AppResult;

/// Prompt sent to the generation backend.
pub const ANSWER_PROMPT: &str = "chat.answer";

/// Message returned when screening rejects the input.
pub const REJECTION_PROMPT: &str = "chat.rejected";

/// Message built from the top document when generation fails.
pub const FALLBACK_PROMPT: &str = "chat.fallback";

/// Message returned when generation fails with nothing retrieved.
pub const APOLOGY_PROMPT: &str = "chat.apology";

const BUILTIN_SOURCES: [(&str, &str); 4] = [
    (ANSWER_PROMPT, include_str!("../prompts/chat.answer.yml")),
    (REJECTION_PROMPT, include_str!("../prompts/chat.rejected.yml")),
    (FALLBACK_PROMPT, include_str!("../prompts/chat.fallback.yml")),
    (APOLOGY_PROMPT, include_str!("../prompts/chat.apology.yml")),
];

/// Variables a prompt must render, per prompt id. Overrides that drop one
/// are refused at load time.
const REQUIRED_VARIABLES: [(&str, &str); 3] = [
    (ANSWER_PROMPT, "message"),
    (REJECTION_PROMPT, "reason"),
    (FALLBACK_PROMPT, "content"),
];

/// The variable a prompt must render, if any.
pub fn required_variable(id: &str) -> Option<&'static str> {
    REQUIRED_VARIABLES
        .iter()
        .find(|(prompt_id, _)| *prompt_id == id)
        .map(|(_, variable)| *variable)
}

/// Ids of every built-in prompt.
pub fn builtin_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_SOURCES.iter().map(|(id, _)| *id)
}

/// Parse a built-in definition by id.
pub fn builtin(id: &str) -> Option<AppResult<PromptDefinition>> {
    BUILTIN_SOURCES
        .iter()
        .find(|(builtin_id, _)| *builtin_id == id)
        .map(|(_, source)| PromptDefinition::from_yaml(source))
}
