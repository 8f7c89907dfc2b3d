//! Configuration loading and typed config structures.
//!
//! The optional `rescue-config.yaml` at the working directory mirrors
//! [`RescueConfig`]. Every section and field has a default, so an empty
//! file (or no file at all) yields a runnable demo. Environment variables
//! override the YAML for deployment-specific values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range, or an override is malformed.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RescueConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Periodic mutator and alert generator settings.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// External language-model collaborator settings.
    #[serde(default)]
    pub llm: LlmSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl RescueConfig {
    /// Load configuration from a YAML file at the given path, then apply
    /// environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load `path` when it exists, otherwise start from defaults. Either way
    /// environment overrides are applied and the result is validated.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override values with process environment variables when set.
    ///
    /// - `PORT`, `RESCUE_HOST` -- listener
    /// - `LLM_BACKEND`, `LLM_API_URL`, `LLM_MODEL`, `LLM_TIMEOUT_MS` -- collaborator
    /// - `LLM_API_KEY`, falling back to `GEMINI_API_KEY` -- collaborator credentials
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Split from [`Self::apply_env_overrides`] so overrides can be
    /// exercised without touching the process environment.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid PORT {port:?}: {e}")))?;
        }
        if let Some(host) = lookup("RESCUE_HOST") {
            self.server.host = host;
        }
        if let Some(backend) = lookup("LLM_BACKEND") {
            self.llm.backend = backend;
        }
        if let Some(api_url) = lookup("LLM_API_URL") {
            self.llm.api_url = api_url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(timeout) = lookup("LLM_TIMEOUT_MS") {
            self.llm.timeout_ms = timeout.parse().map_err(|e| {
                ConfigError::Invalid(format!("invalid LLM_TIMEOUT_MS {timeout:?}: {e}"))
            })?;
        }
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.llm.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        Ok(())
    }

    /// Reject values the timers or generators cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.metrics_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation.metrics_interval_ms must be positive".to_owned(),
            ));
        }
        if sim.alert_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation.alert_interval_ms must be positive".to_owned(),
            ));
        }
        if sim.alert_capacity == 0 {
            return Err(ConfigError::Invalid(
                "simulation.alert_capacity must be at least 1".to_owned(),
            ));
        }
        for (name, chance) in [
            ("alert_chance", sim.alert_chance),
            ("consumption_chance", sim.consumption_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "simulation.{name} must be within [0, 1], got {chance}"
                )));
            }
        }
        if self.llm.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "llm.timeout_ms must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Periodic mutator and alert generator settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationSection {
    /// Milliseconds between metric/route/inventory perturbations.
    #[serde(default = "default_metrics_interval_ms")]
    pub metrics_interval_ms: u64,

    /// Milliseconds between alert generator rolls.
    #[serde(default = "default_alert_interval_ms")]
    pub alert_interval_ms: u64,

    /// Probability that an alert roll produces an alert.
    #[serde(default = "default_alert_chance")]
    pub alert_chance: f64,

    /// Maximum alerts retained in the snapshot.
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,

    /// Per-tick probability that an inventory line is consumed.
    #[serde(default = "default_consumption_chance")]
    pub consumption_chance: f64,

    /// Optional RNG seed for reproducible demos. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationSection {
    /// Mutator period as a [`Duration`].
    pub const fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    /// Alert generator period as a [`Duration`].
    pub const fn alert_interval(&self) -> Duration {
        Duration::from_millis(self.alert_interval_ms)
    }
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            metrics_interval_ms: default_metrics_interval_ms(),
            alert_interval_ms: default_alert_interval_ms(),
            alert_chance: default_alert_chance(),
            alert_capacity: default_alert_capacity(),
            consumption_chance: default_consumption_chance(),
            seed: None,
        }
    }
}

/// Language-model collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LlmSection {
    /// Backend name: `gemini`, `openai` (also `deepseek`, `ollama`),
    /// `anthropic`, or `offline`.
    #[serde(default = "default_llm_backend")]
    pub backend: String,

    /// Base API URL.
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key. Without one the collaborator runs offline.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on a single collaborator call, in milliseconds.
    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,
}

impl LlmSection {
    /// Call timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            backend: default_llm_backend(),
            api_url: default_llm_api_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_ms: default_llm_timeout_ms(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3001
}

const fn default_metrics_interval_ms() -> u64 {
    5_000
}

const fn default_alert_interval_ms() -> u64 {
    15_000
}

const fn default_alert_chance() -> f64 {
    0.3
}

const fn default_alert_capacity() -> usize {
    rescue_types::DEFAULT_ALERT_CAPACITY
}

const fn default_consumption_chance() -> f64 {
    0.3
}

fn default_llm_backend() -> String {
    "gemini".to_owned()
}

fn default_llm_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_owned()
}

const fn default_llm_timeout_ms() -> u64 {
    15_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
