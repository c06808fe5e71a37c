use engine_config::error::{ReportError, SettingsError};
use engine_runtime::error::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Masking job failed: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Failed to render report: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
