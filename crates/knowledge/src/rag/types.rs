//! Chat outcome types.

use serde::Serialize;

/// How a chat answer was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChatStatus {
    /// Screening turned the prompt away; nothing downstream ran
    Rejected { reason: String },

    /// The generation backend answered
    Generated,

    /// The backend failed and a retrieval-based or apology answer was used
    Fallback,
}

/// Result of one chat request. Always carries a user-facing answer.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    /// Answer text shown to the user
    pub answer: String,

    #[serde(flatten)]
    pub status: ChatStatus,

    /// Ids of the retrieved documents, best first
    pub sources: Vec<String>,
}

impl ChatOutcome {
    pub fn rejected(answer: String, reason: String) -> Self {
        Self {
            answer,
            status: ChatStatus::Rejected { reason },
            sources: Vec::new(),
        }
    }

    pub fn generated(answer: String, sources: Vec<String>) -> Self {
        Self {
            answer,
            status: ChatStatus::Generated,
            sources,
        }
    }

    pub fn fallback(answer: String, sources: Vec<String>) -> Self {
        Self {
            answer,
            status: ChatStatus::Fallback,
            sources,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status, ChatStatus::Rejected { .. })
    }
}
