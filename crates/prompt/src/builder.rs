//! Prompt rendering.

use crate::builtin::{builtin_ids, required_variable};
use crate::loader::load_prompt;
use handlebars::Handlebars;
use serpico_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;

/// A registry of compiled prompt templates, one per prompt id.
///
/// Templates are compiled once when the set is built, so rendering only
/// fails on a broken override, never on a missing variable.
pub struct PromptSet {
    registry: Handlebars<'static>,
}

impl PromptSet {
    /// Build the set from built-in definitions only.
    pub fn builtin() -> AppResult<Self> {
        Self::from_definitions(builtin_ids().map(load_builtin))
    }

    /// Build the set, honouring overrides in the workspace.
    pub fn load(workspace_path: &Path) -> AppResult<Self> {
        Self::from_definitions(builtin_ids().map(|id| load_prompt(workspace_path, id)))
    }

    fn from_definitions(
        definitions: impl Iterator<Item = AppResult<crate::types::PromptDefinition>>,
    ) -> AppResult<Self> {
        let mut registry = new_registry();

        for definition in definitions {
            let definition = definition?;
            registry
                .register_template_string(&definition.id, &definition.template)
                .map_err(|e| {
                    AppError::Prompt(format!(
                        "Failed to register template {}: {}",
                        definition.id, e
                    ))
                })?;

            if let Some(variable) = required_variable(&definition.id) {
                check_renders_variable(&registry, &definition.id, variable)?;
            }
        }

        Ok(Self { registry })
    }

    /// Render a prompt by id with string variables.
    pub fn render(&self, id: &str, variables: &HashMap<&str, String>) -> AppResult<String> {
        tracing::debug!("Rendering prompt: {}", id);

        self.registry
            .render(id, variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template {}: {}", id, e)))
    }
}

fn load_builtin(id: &str) -> AppResult<crate::types::PromptDefinition> {
    crate::builtin::builtin(id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", id)))?
}

/// Render with a marker value and make sure the marker comes out.
fn check_renders_variable(registry: &Handlebars<'static>, id: &str, variable: &str) -> AppResult<()> {
    const MARKER: &str = "\u{1}serpico-marker\u{1}";

    let mut variables = HashMap::new();
    variables.insert(variable, MARKER.to_string());

    let rendered = registry
        .render(id, &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template {}: {}", id, e)))?;

    if !rendered.contains(MARKER) {
        return Err(AppError::Prompt(format!(
            "Template {} must use the {{{{{}}}}} variable",
            id, variable
        )));
    }

    Ok(())
}

fn new_registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Plain text output, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{ANSWER_PROMPT, APOLOGY_PROMPT, FALLBACK_PROMPT, REJECTION_PROMPT};
    use tempfile::TempDir;

    #[test]
    fn test_builtin_answer_prompt_embeds_all_parts() {
        let set = PromptSet::builtin().unwrap();
        let mut vars = HashMap::new();
        vars.insert("context", "[1] Hot Pursuit Strategy".to_string());
        vars.insert("webSearch", "Latest pursuit information".to_string());
        vars.insert("message", "how do we run a pursuit & <chase>?".to_string());

        let rendered = set.render(ANSWER_PROMPT, &vars).unwrap();
        assert!(rendered.contains("Context from knowledge base:\n[1] Hot Pursuit Strategy"));
        assert!(rendered.contains("Web search results:\nLatest pursuit information"));
        assert!(rendered.contains("User question: how do we run a pursuit & <chase>?"));
    }

    #[test]
    fn test_builtin_messages() {
        let set = PromptSet::builtin().unwrap();

        let mut vars = HashMap::new();
        vars.insert("reason", "Prompt too short".to_string());
        let rejected = set.render(REJECTION_PROMPT, &vars).unwrap();
        assert!(rejected.contains("Your message was filtered: Prompt too short."));

        let mut vars = HashMap::new();
        vars.insert("content", "Success rate: 85%".to_string());
        let fallback = set.render(FALLBACK_PROMPT, &vars).unwrap();
        assert!(fallback.starts_with("Based on Olathe PD records: Success rate: 85%"));

        let apology = set.render(APOLOGY_PROMPT, &HashMap::new()).unwrap();
        assert!(apology.starts_with("I'm having trouble processing your request"));
    }

    #[test]
    fn test_workspace_override_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".serpico/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("chat.apology.yml"),
            "id: chat.apology\ntitle: Short\napiVersion: \"1.0\"\ntemplate: Try again later.\n",
        )
        .unwrap();

        let set = PromptSet::load(temp_dir.path()).unwrap();
        assert_eq!(
            set.render(APOLOGY_PROMPT, &HashMap::new()).unwrap(),
            "Try again later."
        );
    }

    #[test]
    fn test_broken_override_fails_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".serpico/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("chat.apology.yml"),
            "id: chat.apology\ntitle: Broken\napiVersion: \"1.0\"\ntemplate: \"{{#if}}\"\n",
        )
        .unwrap();

        assert!(PromptSet::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_override_must_keep_required_variable() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".serpico/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("chat.rejected.yml"),
            "id: chat.rejected\ntitle: Terse\napiVersion: \"1.0\"\ntemplate: Filtered.\n",
        )
        .unwrap();

        let err = PromptSet::load(temp_dir.path()).err().unwrap();
        assert!(err.to_string().contains("{{reason}}"));
    }

    #[test]
    fn test_override_with_required_variable_loads() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".serpico/prompts");
        std::fs::create_dir_all(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("chat.fallback.yml"),
            "id: chat.fallback\ntitle: Short\napiVersion: \"1.0\"\ntemplate: \"Records say: {{ content }}\"\n",
        )
        .unwrap();

        let set = PromptSet::load(temp_dir.path()).unwrap();
        let mut vars = HashMap::new();
        vars.insert("content", "85%".to_string());
        assert_eq!(set.render(FALLBACK_PROMPT, &vars).unwrap(), "Records say: 85%");
    }
}
