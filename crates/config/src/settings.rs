//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed on the WebSocket and HTTP endpoints
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// One external HTTP collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Base URL of the service
    pub endpoint: String,

    /// Subscription key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl ProviderEndpoint {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Reasoning collaborator configuration (OpenAI-compatible chat endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningConfig {
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_reasoning_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_reasoning_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> usize {
    1024
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: default_reasoning_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ReasoningConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// All external collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Speech service base (speech-to-text, text-to-speech, translation,
    /// document parsing share one host and subscription key)
    #[serde(default = "default_speech_provider")]
    pub speech: ProviderEndpoint,

    /// Managed retrieval assistant
    #[serde(default = "default_retrieval_provider")]
    pub retrieval: ProviderEndpoint,

    /// Name of the retrieval assistant instance to address
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Reasoning collaborator
    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

fn default_speech_provider() -> ProviderEndpoint {
    ProviderEndpoint::new("https://api.sarvam.ai")
}

fn default_retrieval_provider() -> ProviderEndpoint {
    ProviderEndpoint::new("https://prod-1-data.ke.pinecone.io")
}

fn default_assistant_name() -> String {
    "loan-assistant".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            speech: default_speech_provider(),
            retrieval: default_retrieval_provider(),
            assistant_name: default_assistant_name(),
            reasoning: ReasoningConfig::default(),
        }
    }
}

/// Pipeline behavior toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Score each answer with a second reasoning call (voice front end)
    #[serde(default = "default_true")]
    pub confidence_enabled: bool,

    /// Agent display name used in prompts and history formatting
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
}

fn default_true() -> bool {
    true
}

fn default_agent_name() -> String {
    "FinMate".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_enabled: default_true(),
            agent_name: default_agent_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings before the server starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        let t = self.providers.reasoning.temperature;
        if !(0.0..=2.0).contains(&t) {
            return Err(ConfigError::InvalidValue {
                field: "providers.reasoning.temperature".to_string(),
                message: format!("must be between 0.0 and 2.0, got {t}"),
            });
        }

        for (field, timeout) in [
            ("providers.speech.timeout_ms", self.providers.speech.timeout_ms),
            (
                "providers.retrieval.timeout_ms",
                self.providers.retrieval.timeout_ms,
            ),
            (
                "providers.reasoning.timeout_ms",
                self.providers.reasoning.timeout_ms,
            ),
        ] {
            if timeout == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "timeout must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority: `ADVISOR_*` env vars > `config/{env}.yaml` > `config/default.yaml`
/// > struct defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = Path::new("config/default.yaml");
    if default_path.exists() {
        builder = builder.add_source(File::from(default_path));
    }

    if let Some(env_name) = env {
        let env_path_string = format!("config/{env_name}.yaml");
        let env_path = Path::new(&env_path_string);
        if env_path.exists() {
            builder = builder.add_source(File::from(env_path));
        }
    }

    builder = builder.add_source(Environment::with_prefix("ADVISOR").separator("__"));

    let settings: Settings = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    settings.validate()?;
    Ok(settings)
}
