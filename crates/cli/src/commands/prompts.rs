//! Prompts command handler.

use clap::{Args, Subcommand};
use serpico_core::{config::AppConfig, AppResult};
use serpico_prompt::{list_prompts, load_prompt, PromptOrigin};

/// Inspect prompt templates
#[derive(Args, Debug)]
pub struct PromptsCommand {
    #[command(subcommand)]
    pub action: PromptsAction,
}

#[derive(Subcommand, Debug)]
pub enum PromptsAction {
    /// List prompt ids and where each comes from
    List,
    /// Print the template a prompt id resolves to
    Show {
        /// Prompt id (e.g. chat.answer)
        id: String,
    },
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            PromptsAction::List => {
                for (id, origin) in list_prompts(&config.workspace)? {
                    match origin {
                        PromptOrigin::Builtin => println!("{:<16} built-in", id),
                        PromptOrigin::Workspace(path) => {
                            println!("{:<16} {}", id, path.display())
                        }
                    }
                }
            }
            PromptsAction::Show { id } => {
                let prompt = load_prompt(&config.workspace, id)?;
                println!("# {} ({})", prompt.title, prompt.id);
                println!("{}", prompt.template);
            }
        }

        Ok(())
    }
}
