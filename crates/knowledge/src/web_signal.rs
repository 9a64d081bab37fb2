//! Auxiliary web context for chat answers.
//!
//! The only provider is a deterministic stand-in that returns canned text
//! after a short delay. It exists so the pipeline's concurrency and failure
//! handling are exercised end to end without a network dependency.

use async_trait::async_trait;
use serpico_core::{AppError, AppResult};
use std::time::Duration;

/// Supplies short free-text context for a query.
#[async_trait]
pub trait WebSignalProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether the pipeline should call this provider at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Fetch context for `query`. Failures are `AppError::SignalUnavailable`.
    async fn search(&self, query: &str) -> AppResult<String>;
}

/// Canned, keyword-selected responses.
#[derive(Debug, Clone)]
pub struct CannedWebSignal {
    enabled: bool,
    delay: Duration,
}

impl CannedWebSignal {
    /// Default artificial latency.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

    /// Create a provider. A zero delay is raised to one millisecond so the
    /// call always yields to the runtime.
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            enabled,
            delay: delay.max(Duration::from_millis(1)),
        }
    }

    fn respond(query: &str) -> String {
        let lower = query.to_lowercase();

        if lower.contains("olathe") && lower.contains("crime") {
            "Recent Olathe crime news: Olathe PD reported increased patrols in downtown area. \
             Recent arrests include multiple suspects in connection with robbery cases. \
             Community watch programs active in residential areas."
                .to_string()
        } else if lower.contains("pursuit") || lower.contains("chase") {
            "Latest pursuit information: New pursuit protocols implemented by Olathe PD. \
             Success rates improved with coordinated response strategies. \
             Recent high-speed chase ended safely with suspect in custody."
                .to_string()
        } else if lower.contains("arrest") {
            "Recent arrest data: Olathe PD made 12 arrests this week. \
             Most arrests occurred during evening hours. \
             Multiple suspects apprehended in connection with ongoing investigations."
                .to_string()
        } else {
            format!(
                "Web search results for '{}': Recent information suggests ongoing police \
                 activities in the Olathe area. For specific details, consult official \
                 Olathe PD channels.",
                query
            )
        }
    }
}

impl Default for CannedWebSignal {
    fn default() -> Self {
        Self::new(true, Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl WebSignalProvider for CannedWebSignal {
    fn name(&self) -> &str {
        "canned"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn search(&self, query: &str) -> AppResult<String> {
        if !self.enabled {
            return Err(AppError::SignalUnavailable(
                "web search is disabled".to_string(),
            ));
        }

        tokio::time::sleep(self.delay).await;
        Ok(Self::respond(query))
    }
}
