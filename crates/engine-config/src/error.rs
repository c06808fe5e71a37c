use engine_core::error::EnvironmentError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating masking settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Chunk size {0} is out of range (1..=2000)")]
    ChunkSizeOutOfRange(usize),

    #[error("Setting '{0}' must not be empty")]
    Empty(&'static str),

    #[error("Invalid value '{value}' for {key}")]
    InvalidOverride { key: String, value: String },

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("Webhook notifier configured without a URL")]
    MissingWebhookUrl,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}
