//! Configuration management for Serpico.
//!
//! Configuration is merged from several sources, later sources winning:
//! - Built-in defaults
//! - Config file (`.serpico/config.yaml` or `SERPICO_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Nothing here is mandatory. A missing API key only surfaces when the
//! generation backend is actually called.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Providers the generation factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Default environment variable holding the Gemini API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// A function declaration forwarded to the generation backend as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .serpico/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generation provider ("gemini" or "ollama")
    pub provider: String,

    /// Model identifier passed to the provider
    pub model: String,

    /// API key for the generation provider
    pub api_key: Option<String>,

    /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String,

    /// Custom provider endpoint (base URL)
    pub endpoint: Option<String>,

    /// Directory holding `documents.json`, relative to the workspace unless absolute
    pub data_path: PathBuf,

    /// Whether the web signal provider is consulted
    pub web_search: bool,

    /// Artificial latency of the canned web signal, in milliseconds
    pub web_signal_delay_ms: u64,

    /// Upper bound on a web signal call, in milliseconds
    pub web_signal_timeout_ms: u64,

    /// Upper bound on a generation call, in seconds
    pub generation_timeout_secs: u64,

    /// Sampling temperature sent with every generation call
    pub temperature: Option<f32>,

    /// Output token cap sent with every generation call
    pub max_tokens: Option<u32>,

    /// System instruction sent with every generation call
    pub system_instruction: Option<String>,

    /// Tool declarations passed through to the backend
    pub tools: Vec<ToolSpec>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Text or JSON log lines
    pub log_format: LogFormat,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    storage: Option<StorageSection>,
    #[serde(rename = "webSearch")]
    web_search: Option<WebSearchSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    endpoint: Option<String>,
    timeout: Option<u64>,
    temperature: Option<f32>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Option<String>,
    tools: Option<Vec<ToolSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageSection {
    #[serde(rename = "dataPath")]
    data_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WebSearchSection {
    enabled: Option<bool>,
    #[serde(rename = "delayMs")]
    delay_ms: Option<u64>,
    #[serde(rename = "timeoutMs")]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: None,
            data_path: PathBuf::from("data/rag"),
            web_search: true,
            web_signal_delay_ms: 200,
            web_signal_timeout_ms: 5_000,
            generation_timeout_secs: 30,
            temperature: None,
            max_tokens: None,
            system_instruction: None,
            tools: Vec::new(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Environment variables:
    /// - `SERPICO_WORKSPACE`: Override workspace path
    /// - `SERPICO_CONFIG`: Path to config file
    /// - `SERPICO_PROVIDER`: Generation provider
    /// - `SERPICO_MODEL` / `GEMINI_MODEL`: Model identifier
    /// - `SERPICO_API_KEY`: API key (falls back to the `apiKeyEnv` variable)
    /// - `SERPICO_ENDPOINT`: Provider base URL
    /// - `SERPICO_DATA_PATH`: Document storage directory
    /// - `SERPICO_WEB_SEARCH`: `true`/`false`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    /// - `SERPICO_LOG_FORMAT`: `text` or `json`
    ///
    /// # Example
    /// ```no_run
    /// use serpico_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Documents live in {:?}", config.data_dir());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], but an explicit workspace or config file
    /// (usually from CLI flags) wins before the config file is located.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("SERPICO_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("SERPICO_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.serpico_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("SERPICO_PROVIDER") {
            config.provider = provider;
        }

        if let Some(model) = std::env::var("SERPICO_MODEL")
            .ok()
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .filter(|m| !m.is_empty())
        {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("SERPICO_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(data_path) = std::env::var("SERPICO_DATA_PATH") {
            config.data_path = PathBuf::from(data_path);
        }

        if let Ok(flag) = std::env::var("SERPICO_WEB_SEARCH") {
            match parse_bool(&flag) {
                Some(enabled) => config.web_search = enabled,
                None => tracing::warn!("Ignoring invalid SERPICO_WEB_SEARCH value: {}", flag),
            }
        }

        config.api_key = std::env::var("SERPICO_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if let Ok(format) = std::env::var("SERPICO_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(format) => config.log_format = format,
                None => tracing::warn!("Ignoring invalid SERPICO_LOG_FORMAT value: {}", format),
            }
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.merge(config_file))
    }

    fn merge(&self, config_file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(api_key_env) = llm.api_key_env {
                result.api_key_env = api_key_env;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
            if let Some(timeout) = llm.timeout {
                result.generation_timeout_secs = timeout;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = Some(temperature);
            }
            if let Some(max_tokens) = llm.max_tokens {
                result.max_tokens = Some(max_tokens);
            }
            if let Some(system) = llm.system_instruction {
                result.system_instruction = Some(system);
            }
            if let Some(tools) = llm.tools {
                result.tools = tools;
            }
        }

        if let Some(storage) = config_file.storage {
            if let Some(path) = storage.data_path {
                result.data_path = PathBuf::from(path);
            }
        }

        if let Some(web) = config_file.web_search {
            if let Some(enabled) = web.enabled {
                result.web_search = enabled;
            }
            if let Some(delay) = web.delay_ms {
                result.web_signal_delay_ms = delay;
            }
            if let Some(timeout) = web.timeout_ms {
                result.web_signal_timeout_ms = timeout;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format.as_deref().and_then(LogFormat::parse) {
                result.log_format = format;
            }
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over everything else.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        data_path: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(data_path) = data_path {
            self.data_path = data_path;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .serpico directory.
    pub fn serpico_dir(&self) -> PathBuf {
        self.workspace.join(".serpico")
    }

    /// Directory holding the document collection.
    pub fn data_dir(&self) -> PathBuf {
        if self.data_path.is_absolute() {
            self.data_path.clone()
        } else {
            self.workspace.join(&self.data_path)
        }
    }

    /// Resolve the API key, falling back to the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Validate configuration for the active provider.
    ///
    /// Credentials are not checked here; a missing key surfaces at call time.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.generation_timeout_secs == 0 {
            return Err(AppError::Config(
                "Generation timeout must be greater than zero".to_string(),
            ));
        }

        if self.web_signal_timeout_ms == 0 {
            return Err(AppError::Config(
                "Web signal timeout must be greater than zero".to_string(),
            ));
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::Config(format!(
                    "Temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }

        if let Some(tool) = self.tools.iter().find(|t| t.name.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "Tool declaration has an empty name: {:?}",
                tool
            )));
        }

        Ok(())
    }
}

/// Parse a boolean flag from an environment-style string.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
