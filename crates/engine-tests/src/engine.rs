#[cfg(test)]
mod tests {
    use crate::{
        DATASET, FIELD_SET, collaborators, contacts, entries, inline_metadata, is_masked_email,
        is_masked_text, sandbox_settings,
        utils::{
            BrokenLogSink, FailingChunkStore, ForgetfulJobRegistry, RecordingLogSink,
            RecordingNotifier, UnreachableMetadata,
        },
    };
    use chrono::{Days, Utc};
    use connectors::{
        audit::LogLevel,
        store::{ContactStore, memory::MemoryContactStore},
    };
    use engine_core::{
        context::{env::EnvironmentKind, guard::MaskingGuard},
        error::JobError,
        state::JobResult,
    };
    use engine_runtime::{MaskingJob, execution::phase::JobPhase};
    use model::core::value::Value;
    use std::sync::Arc;
    use tracing_test::traced_test;

    const JOB_ID: &str = "job-test";

    struct Harness {
        store: Arc<FailingChunkStore>,
        sink: Arc<RecordingLogSink>,
        notifier: Arc<RecordingNotifier>,
        job: MaskingJob,
    }

    fn harness(
        fields: &[(&str, &str)],
        records: usize,
        chunk_size: usize,
        store: impl FnOnce(FailingChunkStore) -> FailingChunkStore,
    ) -> Harness {
        harness_with(fields, records, chunk_size, store, RecordingNotifier::default())
    }

    fn harness_with(
        fields: &[(&str, &str)],
        records: usize,
        chunk_size: usize,
        store: impl FnOnce(FailingChunkStore) -> FailingChunkStore,
        notifier: RecordingNotifier,
    ) -> Harness {
        let fields = entries(fields);
        let settings = sandbox_settings(fields.clone(), chunk_size);
        let store = Arc::new(store(FailingChunkStore::new(contacts(records))));
        let sink = Arc::new(RecordingLogSink::default());
        let notifier = Arc::new(notifier);

        let job = MaskingJob::new(
            settings,
            collaborators(
                inline_metadata(fields),
                store.clone(),
                sink.clone(),
                notifier.clone(),
            ),
            JOB_ID,
            MaskingGuard::new(EnvironmentKind::Sandbox, false),
        );

        Harness {
            store,
            sink,
            notifier,
            job,
        }
    }

    #[tokio::test]
    async fn email_field_gets_synthetic_address() {
        let mut h = harness(&[("Email", "email")], 2, 200, |s| s);

        let outcome = h.job.run(None).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Success);
        for record in h.store.inner.snapshot().await {
            let email = record.get_value("Email");
            assert!(is_masked_email(&email), "unexpected email {email:?}");
        }
        assert_eq!(h.job.phase(), JobPhase::Finished);
    }

    #[tokio::test]
    async fn birthdate_is_two_hundred_days_ago() {
        let mut h = harness(&[("Birthdate", "date")], 5, 2, |s| s);

        h.job.run(None).await.unwrap();

        let expected = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(200))
            .unwrap();
        for record in h.store.inner.snapshot().await {
            assert_eq!(record.get_value("Birthdate"), Value::Date(expected));
        }
    }

    #[tokio::test]
    async fn every_type_follows_the_rule_table() {
        let mut h = harness(
            &[
                ("Email", "email"),
                ("Phone", "phone"),
                ("HasOptedOutOfEmail", "boolean"),
                ("MailingStreet", "textarea"),
                ("Score__c", "double"),
                ("Visits__c", "int"),
                ("LastSeen__c", "datetime"),
            ],
            3,
            200,
            |s| s,
        );
        let before = Utc::now();

        h.job.run(None).await.unwrap();

        for record in h.store.inner.snapshot().await {
            assert!(is_masked_email(&record.get_value("Email")));
            assert_eq!(record.get_value("Phone"), Value::String("12345".into()));
            assert_eq!(record.get_value("HasOptedOutOfEmail"), Value::Boolean(false));
            assert!(is_masked_text(&record.get_value("MailingStreet")));
            assert_eq!(record.get_value("Score__c").to_string(), "5.00");
            assert_eq!(record.get_value("Visits__c"), Value::Int(5));
            match record.get_value("LastSeen__c") {
                Value::Timestamp(ts) => assert!(ts >= before && ts <= Utc::now()),
                other => panic!("expected timestamp, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn excluded_text_fields_are_untouched() {
        let mut h = harness(
            &[
                ("Name", "string"),
                ("MailingGeocodeAccuracy", "picklist"),
                ("MailingStreet", "string"),
            ],
            2,
            200,
            |s| s,
        );

        h.job.run(None).await.unwrap();

        for (record, original) in h.store.inner.snapshot().await.iter().zip(contacts(2)) {
            assert_eq!(record.get_value("Name"), original.get_value("Name"));
            assert_eq!(
                record.get_value("MailingGeocodeAccuracy"),
                original.get_value("MailingGeocodeAccuracy")
            );
            assert!(is_masked_text(&record.get_value("MailingStreet")));
        }
    }

    #[tokio::test]
    async fn failed_chunk_is_isolated() {
        // six records in chunks of two; chunk 2 holds 0002 and 0003
        let mut h = harness(&[("Email", "email")], 6, 2, |s| s.failing_on("0003"));

        let outcome = h.job.run(Some("ops@example.com".into())).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Fail);
        assert_eq!(outcome.state.failed_chunks(), &[2]);
        assert_eq!(h.store.update_calls(), 3);

        let failures = h.sink.by_operation("process_chunk");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, LogLevel::Error);
        assert_eq!(failures[0].job_id, JOB_ID);
        assert!(
            failures[0]
                .error
                .as_deref()
                .unwrap()
                .contains("FIELD_CUSTOM_VALIDATION_EXCEPTION on record 0003")
        );
        let extra: serde_json::Value = serde_json::from_str(&failures[0].extra).unwrap();
        assert_eq!(extra["chunk"], 2);
        assert_eq!(extra["first_id"], "0002");

        let store = h.store.inner.snapshot().await;
        let originals = contacts(6);
        for (i, record) in store.iter().enumerate() {
            let email = record.get_value("Email");
            if i == 2 || i == 3 {
                assert_eq!(email, originals[i].get_value("Email"));
            } else {
                assert!(is_masked_email(&email), "record {i} not masked");
            }
        }

        let finish = h.sink.by_operation("finish");
        assert_eq!(finish.len(), 1);
        assert_eq!(finish[0].level, LogLevel::Error);
        assert!(finish[0].message.contains("Job Errored"));
        assert!(outcome.report.render_plain_text().contains("No. of Errors: 1"));

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Result: Fail"));
    }

    #[tokio::test]
    async fn all_chunks_succeed() {
        let mut h = harness(&[("Phone", "phone")], 5, 2, |s| s);

        let outcome = h.job.run(None).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Success);
        assert!(h.sink.errors().is_empty());
        let finish = h.sink.by_operation("finish");
        assert_eq!(finish.len(), 1);
        assert_eq!(finish[0].level, LogLevel::Info);
        assert_eq!(outcome.report.total_items, 3);
        assert_eq!(outcome.report.items_processed, 3);
        assert_eq!(outcome.report.errors, 0);
        assert_eq!(outcome.report.records_masked, 5);
    }

    #[tokio::test]
    async fn no_recipient_means_no_notification() {
        let mut h = harness(&[("Email", "email")], 1, 200, |s| s);
        h.job.run(None).await.unwrap();
        assert_eq!(h.notifier.calls(), 0);
        assert_eq!(h.sink.by_operation("finish").len(), 1);

        let mut h = harness(&[("Email", "email")], 1, 200, |s| s);
        h.job.run(Some("   ".into())).await.unwrap();
        assert_eq!(h.notifier.calls(), 0);
    }

    #[tokio::test]
    async fn report_is_sent_to_the_initiator() {
        let mut h = harness(&[("Email", "email")], 1, 200, |s| s);

        h.job.run(Some("admin@example.com".into())).await.unwrap();

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "admin@example.com");
        assert_eq!(
            sent[0].subject,
            "Batch Processing for Contact Mask update Completed"
        );
        assert_eq!(sent[0].reply_to.as_deref(), Some("noreply@example.com"));
        assert_eq!(
            sent[0].sender_display_name.as_deref(),
            Some("Batch Processing Module")
        );
        assert!(sent[0].body.starts_with("ContactMaskJob Job Successful"));
    }

    #[traced_test]
    #[tokio::test]
    async fn notification_failure_does_not_fail_the_job() {
        let mut h = harness_with(
            &[("Email", "email")],
            1,
            200,
            |s| s,
            RecordingNotifier::rejecting(),
        );

        let outcome = h.job.run(Some("admin@example.com".into())).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Success);
        assert_eq!(h.notifier.calls(), 1);
        assert!(logs_contain("Report delivery failed"));
    }

    #[tokio::test]
    async fn production_run_passes_chunks_through() {
        let fields = entries(&[("Email", "email")]);
        let mut settings = sandbox_settings(fields.clone(), 2);
        settings.environment = EnvironmentKind::Production;
        let store = Arc::new(MemoryContactStore::from_records(contacts(3)));
        let sink = Arc::new(RecordingLogSink::default());

        let mut job = MaskingJob::new(
            settings,
            collaborators(
                inline_metadata(fields),
                store.clone(),
                sink.clone(),
                Arc::new(RecordingNotifier::default()),
            ),
            JOB_ID,
            MaskingGuard::new(EnvironmentKind::Production, false),
        );

        let outcome = job.run(None).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Success);
        assert!(outcome.report.masking_skipped);
        assert_eq!(outcome.report.total_items, 2);
        assert_eq!(store.snapshot().await, contacts(3));
        assert!(
            sink.by_operation("finish")[0]
                .message
                .contains("Masking skipped")
        );
    }

    #[tokio::test]
    async fn test_invocation_masks_in_production() {
        let fields = entries(&[("Phone", "phone")]);
        let store = Arc::new(MemoryContactStore::from_records(contacts(2)));

        let mut job = MaskingJob::new(
            sandbox_settings(fields.clone(), 200),
            collaborators(
                inline_metadata(fields),
                store.clone(),
                Arc::new(RecordingLogSink::default()),
                Arc::new(RecordingNotifier::default()),
            ),
            JOB_ID,
            MaskingGuard::new(EnvironmentKind::Production, true),
        );
        job.run(None).await.unwrap();

        for record in store.snapshot().await {
            assert_eq!(record.get_value("Phone"), Value::String("12345".into()));
        }
    }

    #[tokio::test]
    async fn unreachable_catalog_aborts_before_any_chunk() {
        let store = Arc::new(FailingChunkStore::new(contacts(4)));
        let sink = Arc::new(RecordingLogSink::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let mut job = MaskingJob::new(
            sandbox_settings(vec![], 2),
            collaborators(
                Arc::new(UnreachableMetadata),
                store.clone(),
                sink.clone(),
                notifier.clone(),
            ),
            JOB_ID,
            MaskingGuard::new(EnvironmentKind::Sandbox, false),
        );

        let err = job.run(Some("admin@example.com".into())).await.unwrap_err();

        assert!(matches!(err, JobError::CatalogUnavailable { .. }));
        assert!(err.is_fatal());
        assert_eq!(job.phase(), JobPhase::Aborted);
        assert_eq!(store.update_calls(), 0);
        assert_eq!(store.inner.snapshot().await, contacts(4));
        assert_eq!(notifier.calls(), 0);
        assert!(sink.by_operation("finish").is_empty());
        assert_eq!(sink.by_operation("plan").len(), 1);
    }

    #[tokio::test]
    async fn unplannable_query_aborts_before_any_chunk() {
        let mut h = harness(&[("Id", "string")], 2, 2, |s| s);

        let err = h.job.run(None).await.unwrap_err();

        assert!(matches!(err, JobError::QueryPlan(_)));
        assert_eq!(h.store.update_calls(), 0);
    }

    #[tokio::test]
    async fn unreadable_chunk_stops_the_run_but_still_reports() {
        let mut h = harness(&[("Email", "email")], 6, 2, |s| s.failing_fetch_from(4));

        let outcome = h.job.run(None).await.unwrap();

        assert_eq!(outcome.result(), JobResult::Fail);
        assert_eq!(outcome.state.failed_chunks(), &[3]);
        assert_eq!(h.store.update_calls(), 2);
        assert_eq!(h.sink.by_operation("fetch_chunk").len(), 1);
        assert_eq!(h.sink.by_operation("finish")[0].level, LogLevel::Error);
    }

    #[tokio::test]
    async fn remasking_keeps_rule_predicates() {
        let fields = entries(&[("Email", "email"), ("Phone", "phone"), ("Birthdate", "date")]);
        let store = Arc::new(MemoryContactStore::from_records(contacts(3)));

        for _ in 0..2 {
            let mut job = MaskingJob::new(
                sandbox_settings(fields.clone(), 2),
                collaborators(
                    inline_metadata(fields.clone()),
                    store.clone(),
                    Arc::new(RecordingLogSink::default()),
                    Arc::new(RecordingNotifier::default()),
                ),
                JOB_ID,
                MaskingGuard::new(EnvironmentKind::Sandbox, false),
            );
            assert_eq!(job.run(None).await.unwrap().result(), JobResult::Success);
        }

        let expected = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(200))
            .unwrap();
        for record in store.snapshot().await {
            assert!(is_masked_email(&record.get_value("Email")));
            assert_eq!(record.get_value("Phone"), Value::String("12345".into()));
            assert_eq!(record.get_value("Birthdate"), Value::Date(expected));
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn missing_execution_metadata_falls_back_to_local_counters() {
        let h = harness(&[("Email", "email")], 3, 2, |s| s);
        let mut job = h.job.with_execution_metadata(Arc::new(ForgetfulJobRegistry));

        let outcome = job.run(None).await.unwrap();

        assert_eq!(outcome.report.total_items, 2);
        assert_eq!(outcome.report.items_processed, 2);
        assert!(logs_contain("Execution metadata unavailable"));
    }

    #[traced_test]
    #[tokio::test]
    async fn broken_log_sink_does_not_fail_the_job() {
        let fields = entries(&[("Email", "email")]);
        let store: Arc<dyn ContactStore> = Arc::new(MemoryContactStore::from_records(contacts(1)));

        let mut job = MaskingJob::new(
            sandbox_settings(fields.clone(), 2),
            collaborators(
                inline_metadata(fields),
                store,
                Arc::new(BrokenLogSink),
                Arc::new(RecordingNotifier::default()),
            ),
            JOB_ID,
            MaskingGuard::new(EnvironmentKind::Sandbox, false),
        );

        assert_eq!(job.run(None).await.unwrap().result(), JobResult::Success);
        assert!(logs_contain("Failed to write log entry"));
    }

    #[test]
    fn fixtures_use_the_default_names() {
        let settings = sandbox_settings(vec![], 1);
        assert_eq!(settings.dataset, DATASET);
        assert_eq!(settings.field_set, FIELD_SET);
    }
}
