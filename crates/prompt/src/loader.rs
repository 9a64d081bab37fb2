//! Prompt loader: workspace overrides first, built-ins second.

use crate::builtin::{builtin, builtin_ids};
use crate::types::PromptDefinition;
use serpico_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Where a prompt definition comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOrigin {
    Builtin,
    Workspace(PathBuf),
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".serpico/prompts")
}

/// Load a prompt definition by ID.
///
/// A file named `<id>.yml` in `.serpico/prompts/` wins over the built-in
/// definition of the same id.
///
/// # Example
/// ```no_run
/// use serpico_prompt::{load_prompt, ANSWER_PROMPT};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), ANSWER_PROMPT)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if prompt_file.exists() {
        tracing::debug!("Loading prompt override from: {:?}", prompt_file);

        let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                prompt_file, e
            ))
        })?;

        let definition = PromptDefinition::from_yaml(&contents)
            .map_err(|e| AppError::Prompt(format!("{:?}: {}", prompt_file, e)))?;

        if definition.id != prompt_id {
            return Err(AppError::Prompt(format!(
                "Prompt file {:?} declares id '{}', expected '{}'",
                prompt_file, definition.id, prompt_id
            )));
        }

        tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
        return Ok(definition);
    }

    builtin(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?
}

/// List all available prompt IDs with their origin, sorted by id.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<(String, PromptOrigin)>> {
    let mut prompts: Vec<(String, PromptOrigin)> = builtin_ids()
        .map(|id| (id.to_string(), PromptOrigin::Builtin))
        .collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("yml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let origin = PromptOrigin::Workspace(path.to_path_buf());
            match prompts.iter_mut().find(|(id, _)| id == stem) {
                Some(existing) => existing.1 = origin,
                None => prompts.push((stem.to_string(), origin)),
            }
        }
    }

    prompts.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(prompts)
}
