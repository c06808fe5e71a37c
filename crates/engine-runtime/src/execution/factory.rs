use crate::error::RuntimeError;
use connectors::{
    audit::{FanoutLogSink, LogSink, jsonl::JsonLinesLogSink, tracing_sink::TracingLogSink},
    metadata::{
        MetadataSource, file::FileMetadataSource, inline::InlineMetadataSource,
        postgres::PgMetadataSource,
    },
    notify::{Notifier, tracing_notifier::TracingNotifier, webhook::WebhookNotifier},
    store::{
        ContactStore, json_file::JsonFileContactStore, memory::MemoryContactStore,
        postgres::PgContactStore,
    },
};
use engine_config::{
    error::SettingsError,
    settings::{
        MaskingSettings,
        report::{NotifierKind, ReportSettings},
        sources::{MetadataSettings, StoreSettings},
    },
};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// The external collaborators one run talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub metadata: Arc<dyn MetadataSource>,
    pub store: Arc<dyn ContactStore>,
    pub log_sink: Arc<dyn LogSink>,
    pub notifier: Arc<dyn Notifier>,
}

pub async fn create_collaborators(
    settings: &MaskingSettings,
) -> Result<Collaborators, RuntimeError> {
    let collaborators = Collaborators {
        metadata: create_metadata_source(settings).await?,
        store: create_store(&settings.store, &settings.id_field).await?,
        log_sink: create_log_sink(settings),
        notifier: create_notifier(&settings.report)?,
    };
    info!(
        metadata = %collaborators.metadata.name(),
        store = %collaborators.store.name(),
        notifier = %collaborators.notifier.name(),
        "Collaborators ready"
    );
    Ok(collaborators)
}

pub async fn create_metadata_source(
    settings: &MaskingSettings,
) -> Result<Arc<dyn MetadataSource>, RuntimeError> {
    let source: Arc<dyn MetadataSource> = match &settings.metadata {
        MetadataSettings::Inline { fields } => Arc::new(InlineMetadataSource::new(
            &settings.dataset,
            &settings.field_set,
            fields.clone(),
        )),
        MetadataSettings::File { path } => Arc::new(FileMetadataSource::new(path.clone())),
        MetadataSettings::Postgres { url } => Arc::new(PgMetadataSource::connect(url).await?),
    };
    Ok(source)
}

pub async fn create_store(
    settings: &StoreSettings,
    id_field: &str,
) -> Result<Arc<dyn ContactStore>, RuntimeError> {
    let store: Arc<dyn ContactStore> = match settings {
        StoreSettings::Memory => Arc::new(MemoryContactStore::new()),
        StoreSettings::Json { path } => Arc::new(JsonFileContactStore::open(path.clone(), id_field).await?),
        StoreSettings::Postgres { url } => Arc::new(PgContactStore::connect(url).await?),
    };
    Ok(store)
}

/// Tracing always, plus the audit file when one is configured.
pub fn create_log_sink(settings: &MaskingSettings) -> Arc<dyn LogSink> {
    match &settings.audit_log {
        Some(path) => Arc::new(FanoutLogSink::new(vec![
            Arc::new(TracingLogSink),
            Arc::new(JsonLinesLogSink::new(path.clone())),
        ])),
        None => Arc::new(TracingLogSink),
    }
}

pub fn create_notifier(settings: &ReportSettings) -> Result<Arc<dyn Notifier>, RuntimeError> {
    match settings.notifier {
        NotifierKind::Tracing => Ok(Arc::new(TracingNotifier)),
        NotifierKind::Webhook => {
            let url = settings
                .webhook_url
                .as_deref()
                .ok_or(SettingsError::MissingWebhookUrl)?;
            Ok(Arc::new(
                WebhookNotifier::new(url, settings.auth_token.clone())
                    .with_attempts(5, Duration::from_millis(100)),
            ))
        }
    }
}
