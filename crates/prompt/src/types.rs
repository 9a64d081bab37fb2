//! Prompt definition types.

use serde::{Deserialize, Serialize};
use serpico_core::{AppError, AppResult};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier (e.g. "chat.answer")
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// What the prompt is used for
    #[serde(default)]
    pub description: String,

    /// Template string with Handlebars syntax
    pub template: String,
}

impl PromptDefinition {
    /// Parse and validate a definition from YAML text.
    pub fn from_yaml(contents: &str) -> AppResult<Self> {
        let definition: PromptDefinition = serde_yaml::from_str(contents)
            .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML: {}", e)))?;
        definition.validate()?;
        Ok(definition)
    }

    /// Check required fields.
    pub fn validate(&self) -> AppResult<()> {
        if self.id.is_empty() {
            return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
        }

        if self.title.is_empty() {
            return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
        }

        if self.template.is_empty() {
            return Err(AppError::Prompt(format!(
                "Prompt template cannot be empty ({})",
                self.id
            )));
        }

        if !self.api_version.contains('.') {
            return Err(AppError::Prompt(format!(
                "Invalid apiVersion format: {}. Expected format: 'x.y'",
                self.api_version
            )));
        }

        Ok(())
    }
}
