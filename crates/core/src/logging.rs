//! Logging infrastructure for Serpico.
//!
//! Logs go to stderr so stdout stays clean for answers and JSON output.
//! Two line formats are available: human-readable text and one JSON object
//! per event for log shippers.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Filter used when neither the caller nor `RUST_LOG` picks one.
const DEFAULT_FILTER: &str = "info";

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse "text" or "json" (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Build the event filter from an explicit level, `RUST_LOG`, or the default.
fn build_filter(log_level: Option<&str>) -> AppResult<EnvFilter> {
    let directives = match log_level {
        Some(level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| AppError::Config(format!("Invalid log filter {:?}: {}", directives, e)))
}

/// Install the global subscriber.
///
/// `log_level` accepts any `EnvFilter` directive, e.g. `debug` or
/// `serpico_knowledge=trace`. Colors are only used for text output.
///
/// # Example
/// ```no_run
/// use serpico_core::logging::{init_logging, LogFormat};
///
/// init_logging(None, false, LogFormat::Text).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool, format: LogFormat) -> AppResult<()> {
    let registry = tracing_subscriber::registry().with(build_filter(log_level)?);

    let installed = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(!no_color),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    };

    installed.map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))
}
