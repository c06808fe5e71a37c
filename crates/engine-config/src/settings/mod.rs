use crate::error::SettingsError;
use engine_core::context::env::{
    ENV_AUTH_TOKEN, ENV_CHUNK_SIZE, ENV_ENVIRONMENT, ENV_REPORT_CALLBACK_URL, EnvContext,
    EnvironmentKind,
};
use report::{NotifierKind, ReportSettings};
use retry::RetrySettings;
use serde::{Deserialize, Serialize};
use sources::{MetadataSettings, StoreSettings};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod report;
pub mod retry;
pub mod sources;

pub const MIN_CHUNK_SIZE: usize = 1;
pub const MAX_CHUNK_SIZE: usize = 2000;

/// Everything one masking run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingSettings {
    pub dataset: String,
    pub id_field: String,
    pub field_set: String,
    pub chunk_size: usize,
    pub environment: EnvironmentKind,
    /// Text fields the store computes itself and rejects writes to.
    pub excluded_text_fields: Vec<String>,
    pub metadata: MetadataSettings,
    pub store: StoreSettings,
    pub retry: RetrySettings,
    pub report: ReportSettings,
    pub audit_log: Option<PathBuf>,
}

impl Default for MaskingSettings {
    fn default() -> Self {
        Self {
            dataset: "contact".to_string(),
            id_field: "id".to_string(),
            field_set: "ContactFieldsForUpdate".to_string(),
            chunk_size: 200,
            environment: EnvironmentKind::Production,
            excluded_text_fields: vec!["Name".to_string(), "MailingGeocodeAccuracy".to_string()],
            metadata: MetadataSettings::default(),
            store: StoreSettings::default(),
            retry: RetrySettings::default(),
            report: ReportSettings::default(),
            audit_log: None,
        }
    }
}

impl MaskingSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a settings file, layers the environment over it and validates
    /// the result.
    pub fn load(path: &Path, env: &EnvContext) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_json(&raw)?;
        settings.apply_env(env)?;
        settings.validate()?;
        debug!(path = %path.display(), dataset = %settings.dataset, "Loaded masking settings");
        Ok(settings)
    }

    pub fn apply_env(&mut self, env: &EnvContext) -> Result<(), SettingsError> {
        if let Some(value) = env.get(ENV_ENVIRONMENT) {
            self.environment = value.parse()?;
        }

        if let Some(value) = env.get(ENV_CHUNK_SIZE) {
            self.chunk_size = value
                .parse()
                .map_err(|_| SettingsError::InvalidOverride {
                    key: ENV_CHUNK_SIZE.to_string(),
                    value: value.clone(),
                })?;
        }

        if let Some(url) = env.get(ENV_REPORT_CALLBACK_URL) {
            self.report.webhook_url = Some(url);
            self.report.notifier = NotifierKind::Webhook;
        }

        if let Some(token) = env.get(ENV_AUTH_TOKEN) {
            self.report.auth_token = Some(token);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(SettingsError::ChunkSizeOutOfRange(self.chunk_size));
        }

        for (name, value) in [
            ("dataset", &self.dataset),
            ("id_field", &self.id_field),
            ("field_set", &self.field_set),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::Empty(name));
            }
        }

        if self.report.notifier == NotifierKind::Webhook
            && self
                .report
                .webhook_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(SettingsError::MissingWebhookUrl);
        }

        Ok(())
    }
}
