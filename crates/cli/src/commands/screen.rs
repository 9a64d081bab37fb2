//! Screen command handler.

use super::print_json;
use clap::Args;
use serpico_core::AppResult;
use serpico_knowledge::PromptScreener;

/// Check whether a prompt would be admitted
#[derive(Args, Debug)]
pub struct ScreenCommand {
    /// Prompt to check
    pub prompt: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScreenCommand {
    pub fn execute(&self) -> AppResult<()> {
        let verdict = PromptScreener::new().screen(&self.prompt);

        if self.json {
            return print_json(&verdict);
        }

        if verdict.admitted {
            println!("admitted");
        } else {
            println!("rejected: {}", verdict.reason);
        }

        Ok(())
    }
}
