//! Configuration for the loan advisor backend
//!
//! Settings are layered: `config/default.yaml`, then `config/{env}.yaml`,
//! then `ADVISOR_*` environment variables. Numeric limits that are part of
//! the pipeline's behavioral contract (chunk sizes, history cap) live in
//! [`constants`] rather than in mutable settings.

pub mod constants;
pub mod patterns;
pub mod settings;

pub use settings::{
    load_settings, ObservabilityConfig, PipelineConfig, ProviderEndpoint, ProvidersConfig,
    ReasoningConfig, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
