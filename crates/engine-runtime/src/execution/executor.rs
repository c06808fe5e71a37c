use crate::{
    error::RuntimeError,
    execution::{
        factory::{self, Collaborators},
        phase::JobPhase,
    },
};
use chrono::{DateTime, Utc};
use connectors::{
    audit::{LogEntry, LogLevel},
    notify::Notification,
};
use engine_config::{report::ExecutionReport, settings::MaskingSettings};
use engine_core::{
    context::{env::EnvContext, guard::MaskingGuard},
    error::JobError,
    job_info::{ExecutionMetadataSource, JobInfo, LocalJobTracker, resolve_job_id},
    metrics::Metrics,
    state::{JobResult, JobState},
};
use engine_processing::{
    catalog::FieldCatalog,
    consumer::ChunkWriter,
    producer::ChunkReader,
    transform::{MaskRules, RecordTransformer},
};
use model::{catalog::field::MaskableFieldSpec, records::chunk::Chunk};
use planner::query::builder::{MaskQuery, build_query};
use std::sync::Arc;
use tracing::{error, info, warn};

const JOB_ID_LABEL: &str = "Job Id";

/// What a run hands back once it reached `Finished`.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub state: JobState,
    pub report: ExecutionReport,
}

impl JobOutcome {
    pub fn result(&self) -> JobResult {
        self.state.result()
    }
}

/// Loads collaborators from `settings` and runs one masking job.
///
/// `initiator` receives the report when it is a non-blank address.
pub async fn run_masking_job(
    settings: MaskingSettings,
    initiator: Option<String>,
    test_invocation: bool,
) -> Result<JobOutcome, RuntimeError> {
    let env = EnvContext::from_process();
    let job_id = resolve_job_id(&env);
    let collaborators = factory::create_collaborators(&settings).await?;
    let guard = MaskingGuard::new(settings.environment, test_invocation);

    let mut job = MaskingJob::new(settings, collaborators, &job_id, guard);
    Ok(job.run(initiator).await?)
}

/// The orchestrator: plan, process every chunk, finish.
pub struct MaskingJob {
    settings: MaskingSettings,
    collaborators: Collaborators,
    job_id: String,
    guard: MaskingGuard,
    transformer: RecordTransformer,
    metrics: Metrics,
    execution_metadata: Arc<dyn ExecutionMetadataSource>,
    phase: JobPhase,
}

impl MaskingJob {
    pub fn new(
        settings: MaskingSettings,
        collaborators: Collaborators,
        job_id: &str,
        guard: MaskingGuard,
    ) -> Self {
        let metrics = Metrics::new();
        let transformer = RecordTransformer::new(&settings.excluded_text_fields);
        let execution_metadata = Arc::new(LocalJobTracker::new(job_id, metrics.clone()));

        Self {
            settings,
            collaborators,
            job_id: job_id.to_string(),
            guard,
            transformer,
            metrics,
            execution_metadata,
            phase: JobPhase::Pending,
        }
    }

    pub fn with_transformer(mut self, transformer: RecordTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Replaces the in-process tracker, e.g. with the host's job registry.
    pub fn with_execution_metadata(mut self, source: Arc<dyn ExecutionMetadataSource>) -> Self {
        self.execution_metadata = source;
        self
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Runs the job to `Finished`. Only catalog and planning failures are
    /// returned; chunk failures end up in the state, the log and the report.
    pub async fn run(&mut self, initiator: Option<String>) -> Result<JobOutcome, JobError> {
        let mut state = JobState::new(&self.job_id, initiator);

        let query = match self.plan().await {
            Ok(query) => Arc::new(query),
            Err(err) => {
                self.phase = JobPhase::Aborted;
                error!(job_id = %self.job_id, error = %err, "Masking job aborted during planning");
                self.log(
                    self.entry(LogLevel::Error, "plan", &state, "Masking job aborted")
                        .with_error(&err),
                )
                .await;
                return Err(err);
            }
        };

        self.phase = JobPhase::Planned;
        info!(
            job_id = %self.job_id,
            fields = query.fields.len(),
            chunk_size = self.settings.chunk_size,
            masking = self.guard.allows_masking(),
            "Masking job planned"
        );

        self.phase = JobPhase::Running;
        self.process_chunks(&query, &mut state).await;

        let report = self.finish(&state).await;
        self.phase = JobPhase::Finished;

        Ok(JobOutcome { state, report })
    }

    async fn plan(&self) -> Result<MaskQuery, JobError> {
        let catalog = FieldCatalog::new(
            self.collaborators.metadata.clone(),
            &self.settings.dataset,
            &self.settings.field_set,
        );
        let fields = catalog
            .resolve_fields()
            .await
            .map_err(|e| JobError::CatalogUnavailable {
                source: Box::new(e),
            })?;

        let query = build_query(&self.settings.dataset, &self.settings.id_field, &fields)?;
        Ok(query.with_read_only(self.transformer.excluded_paths(&fields)))
    }

    async fn process_chunks(&self, query: &Arc<MaskQuery>, state: &mut JobState) {
        let retry = self.settings.retry.policy().with_metrics(self.metrics.clone());
        let mut reader = ChunkReader::new(
            self.collaborators.store.clone(),
            query.clone(),
            retry.clone(),
            self.settings.chunk_size,
        );
        let writer = ChunkWriter::new(self.collaborators.store.clone(), query.clone(), retry);

        loop {
            let chunk = match reader.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    let chunk = err.chunk();
                    self.metrics.record_chunk_read(0);
                    self.metrics.record_chunk_failed();
                    state.record_failure(chunk);

                    let failure = JobError::ChunkFetch {
                        chunk,
                        source: err.into_store_error(),
                    };
                    error!(job_id = %self.job_id, chunk, error = %failure, "Stopping after unreadable chunk");
                    self.log(
                        self.entry(
                            LogLevel::Error,
                            "fetch_chunk",
                            state,
                            &format!("Failed to read chunk {chunk}"),
                        )
                        .with_error(&failure),
                    )
                    .await;
                    break;
                }
            };

            self.metrics.record_chunk_read(chunk.len() as u64);

            if !self.guard.allows_masking() {
                self.metrics.record_chunk_processed(0);
                continue;
            }

            self.mask_chunk(&chunk, &query.fields, state, &writer).await;
        }
    }

    async fn mask_chunk(
        &self,
        chunk: &Chunk,
        fields: &[MaskableFieldSpec],
        state: &mut JobState,
        writer: &ChunkWriter,
    ) {
        let masked = self
            .transformer
            .transform_at(&chunk.records, fields, &MaskRules::now());

        match writer.persist(chunk.index, &masked).await {
            Ok(result) => self.metrics.record_chunk_processed(result.rows_written as u64),
            Err(err) => {
                self.metrics.record_chunk_failed();
                state.record_failure(chunk.index);

                let failure = JobError::ChunkPersist {
                    chunk: chunk.index,
                    source: err.into_store_error(),
                };
                warn!(job_id = %self.job_id, chunk = chunk.index, error = %failure, "Chunk not persisted, continuing");
                self.log(
                    self.entry(
                        LogLevel::Error,
                        "process_chunk",
                        state,
                        &format!("Failed to persist chunk {}", chunk.index),
                    )
                    .with_extra(chunk.describe().to_string())
                    .with_error(&failure),
                )
                .await;
            }
        }
    }

    async fn finish(&self, state: &JobState) -> ExecutionReport {
        let finished_at = Utc::now();
        self.metrics.mark_completed(finished_at);

        let info = self.job_info().await;
        let report = ExecutionReport::new(
            &self.settings.report.job_name,
            state,
            &info,
            &self.metrics.snapshot(),
            finished_at,
            !self.guard.allows_masking(),
        );
        let body = report.render_plain_text();

        let level = match state.result() {
            JobResult::Success => LogLevel::Info,
            JobResult::Fail => LogLevel::Error,
        };
        self.log(self.entry_at(level, "finish", state, &body, finished_at))
            .await;

        info!(
            job_id = %self.job_id,
            result = %state.result(),
            chunks = info.total_items,
            errors = info.errors,
            duration_ms = report.elapsed_ms,
            "Masking job finished"
        );

        match state.recipient() {
            Some(to) => self.notify(to, &report, body).await,
            None => info!(job_id = %self.job_id, "No recipient configured, report not sent"),
        }

        report
    }

    /// Host metadata, or the local counters when the host cannot answer.
    async fn job_info(&self) -> JobInfo {
        match self.execution_metadata.job_info(&self.job_id).await {
            Ok(info) => info,
            Err(err) => {
                warn!(job_id = %self.job_id, error = %err, "Execution metadata unavailable, using local counters");
                LocalJobTracker::new(&self.job_id, self.metrics.clone()).snapshot()
            }
        }
    }

    async fn notify(&self, to: &str, report: &ExecutionReport, body: String) {
        let notification = Notification {
            to: to.to_string(),
            subject: report.subject(&self.settings.report.subject),
            body,
            reply_to: Some(self.settings.report.reply_to.clone()),
            sender_display_name: Some(self.settings.report.sender_display_name.clone()),
        };

        if let Err(err) = self.collaborators.notifier.send(&notification).await {
            let err = JobError::Notification(err);
            warn!(job_id = %self.job_id, %to, error = %err, "Report delivery failed");
        }
    }

    fn entry(&self, level: LogLevel, operation: &str, state: &JobState, message: &str) -> LogEntry {
        self.entry_at(level, operation, state, message, Utc::now())
    }

    fn entry_at(
        &self,
        level: LogLevel,
        operation: &str,
        state: &JobState,
        message: &str,
        at: DateTime<Utc>,
    ) -> LogEntry {
        LogEntry {
            level,
            component: self.settings.report.job_name.clone(),
            operation: operation.to_string(),
            job_id: self.job_id.clone(),
            job_id_label: JOB_ID_LABEL.to_string(),
            message: message.to_string(),
            extra: String::new(),
            error: None,
            elapsed_ms: state.elapsed_ms(at),
            logged_at: at,
        }
    }

    async fn log(&self, entry: LogEntry) {
        if let Err(err) = self.collaborators.log_sink.write(&entry).await {
            warn!(job_id = %self.job_id, operation = %entry.operation, error = %err, "Failed to write log entry");
        }
    }
}
