#[cfg(test)]
mod tests {
    use crate::TEST_PG_URL;
    use chrono::{Days, Utc};
    use connectors::audit::{LogEntry, LogLevel};
    use engine_config::settings::{
        MaskingSettings,
        sources::{MetadataSettings, StoreSettings},
    };
    use engine_core::{context::env::EnvironmentKind, state::JobResult};
    use engine_runtime::{error::RuntimeError, run_masking_job};
    use serde_json::{Value as JsonValue, json};
    use std::path::Path;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    fn write_json(path: &Path, value: &JsonValue) {
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> JsonValue {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn audit_entries(path: &Path) -> Vec<LogEntry> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn field_sets() -> JsonValue {
        json!({
            "contact": {
                "ContactFieldsForUpdate": [
                    { "field_path": "Email", "value_type": "email" },
                    { "field_path": "Phone", "value_type": "phone" },
                    { "field_path": "Birthdate", "value_type": "date" },
                    { "field_path": "Name", "value_type": "string" },
                    { "field_path": "DoNotCall", "value_type": "boolean" }
                ]
            }
        })
    }

    fn contacts_file() -> JsonValue {
        json!([
            { "id": "003A", "Email": "jane@corp.example", "Phone": "+1 555 0100", "Birthdate": "1984-02-11", "Name": "Jane Roe", "DoNotCall": true, "Title": "CFO" },
            { "id": "003B", "Email": "john@corp.example", "Phone": "+1 555 0101", "Birthdate": "1979-12-01", "Name": "John Doe", "DoNotCall": false, "Title": "CTO" },
            { "id": "003C", "Email": null, "Phone": null, "Birthdate": null, "Name": "Ann Poe", "DoNotCall": true, "Title": "COO" }
        ])
    }

    #[traced_test]
    #[tokio::test]
    async fn masks_a_json_contact_file_end_to_end() {
        let dir = tempdir().unwrap();
        let metadata_path = dir.path().join("field_sets.json");
        let store_path = dir.path().join("contacts.json");
        let audit_path = dir.path().join("logs/audit.jsonl");
        write_json(&metadata_path, &field_sets());
        write_json(&store_path, &contacts_file());

        let settings = MaskingSettings {
            chunk_size: 2,
            environment: EnvironmentKind::Sandbox,
            metadata: MetadataSettings::File {
                path: metadata_path,
            },
            store: StoreSettings::Json {
                path: store_path.clone(),
            },
            audit_log: Some(audit_path.clone()),
            ..MaskingSettings::default()
        };

        let outcome = run_masking_job(settings, None, false).await.unwrap();
        assert_eq!(outcome.result(), JobResult::Success);
        assert_eq!(outcome.report.total_items, 2);

        let expected_date = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(200))
            .unwrap()
            .format("%Y-%m-%d")
            .to_string();

        let stored = read_json(&store_path);
        let rows = stored.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        for (row, original) in rows.iter().zip(contacts_file().as_array().unwrap()) {
            let email = row["Email"].as_str().unwrap();
            assert!(email.starts_with("test") && email.ends_with("@dummy.com"));
            assert_eq!(row["Phone"], "12345");
            assert_eq!(row["Birthdate"], expected_date.as_str());
            assert_eq!(row["DoNotCall"], false);
            assert_eq!(row["Name"], original["Name"]);
            assert_eq!(row["Title"], original["Title"]);
        }

        let audit = audit_entries(&audit_path);
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].level, LogLevel::Info);
        assert_eq!(audit[0].operation, "finish");
        assert_eq!(audit[0].job_id, outcome.state.job_id());
        assert!(logs_contain("Masking job finished"));
    }

    #[tokio::test]
    async fn editing_the_field_set_file_changes_the_next_run() {
        let dir = tempdir().unwrap();
        let metadata_path = dir.path().join("field_sets.json");
        let store_path = dir.path().join("contacts.json");
        write_json(&store_path, &contacts_file());
        write_json(
            &metadata_path,
            &json!({ "contact": { "ContactFieldsForUpdate": [
                { "field_path": "Phone", "value_type": "phone" }
            ] } }),
        );

        let settings = MaskingSettings {
            environment: EnvironmentKind::Sandbox,
            metadata: MetadataSettings::File {
                path: metadata_path.clone(),
            },
            store: StoreSettings::Json {
                path: store_path.clone(),
            },
            ..MaskingSettings::default()
        };

        run_masking_job(settings.clone(), None, false).await.unwrap();
        let first = read_json(&store_path);
        assert_eq!(first[0]["Phone"], "12345");
        assert_eq!(first[0]["Title"], "CFO");

        write_json(
            &metadata_path,
            &json!({ "contact": { "ContactFieldsForUpdate": [
                { "field_path": "Title", "value_type": "string" }
            ] } }),
        );
        run_masking_job(settings, None, false).await.unwrap();
        let second = read_json(&store_path);
        let title = second[0]["Title"].as_str().unwrap();
        assert!(title.starts_with("test") && title.len() == 12);
    }

    #[tokio::test]
    async fn missing_field_set_is_fatal() {
        let dir = tempdir().unwrap();
        let metadata_path = dir.path().join("field_sets.json");
        let store_path = dir.path().join("contacts.json");
        write_json(&metadata_path, &json!({ "contact": {} }));
        write_json(&store_path, &contacts_file());

        let settings = MaskingSettings {
            environment: EnvironmentKind::Sandbox,
            metadata: MetadataSettings::File {
                path: metadata_path,
            },
            store: StoreSettings::Json {
                path: store_path.clone(),
            },
            ..MaskingSettings::default()
        };

        let err = run_masking_job(settings, None, false).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Job(_)));
        assert_eq!(read_json(&store_path), contacts_file());
    }

    #[ignore] // needs the Postgres test database
    #[tokio::test]
    async fn masks_a_postgres_contact_table() {
        let client = connectors::postgres::connect_client(TEST_PG_URL)
            .await
            .expect("connect postgres");
        client
            .batch_execute(
                r#"
                DROP TABLE IF EXISTS mask_field_sets;
                DROP TABLE IF EXISTS contact;
                CREATE TABLE mask_field_sets (
                    dataset TEXT NOT NULL,
                    field_set TEXT NOT NULL,
                    field_path TEXT NOT NULL,
                    value_type TEXT NOT NULL,
                    position INT NOT NULL
                );
                INSERT INTO mask_field_sets VALUES
                    ('contact', 'ContactFieldsForUpdate', 'email', 'email', 1),
                    ('contact', 'ContactFieldsForUpdate', 'birthdate', 'date', 2),
                    ('contact', 'ContactFieldsForUpdate', 'score', 'double', 3);
                CREATE TABLE contact (
                    id TEXT PRIMARY KEY,
                    email TEXT,
                    birthdate DATE,
                    score NUMERIC(10, 2)
                );
                INSERT INTO contact
                SELECT lpad(g::text, 4, '0'), 'user' || g || '@corp.example', DATE '1980-01-01', 99.5
                FROM generate_series(1, 25) g;
                "#,
            )
            .await
            .expect("seed postgres");

        let settings = MaskingSettings {
            chunk_size: 10,
            environment: EnvironmentKind::Sandbox,
            metadata: MetadataSettings::Postgres {
                url: TEST_PG_URL.to_string(),
            },
            store: StoreSettings::Postgres {
                url: TEST_PG_URL.to_string(),
            },
            ..MaskingSettings::default()
        };

        let outcome = run_masking_job(settings, None, false).await.unwrap();
        assert_eq!(outcome.result(), JobResult::Success);
        assert_eq!(outcome.report.total_items, 3);

        let unmasked: i64 = client
            .query_one(
                "SELECT count(*) FROM contact \
                 WHERE email NOT LIKE 'test%@dummy.com' \
                    OR birthdate <> CURRENT_DATE - 200 \
                    OR score <> 5.00",
                &[],
            )
            .await
            .unwrap()
            .get(0);
        assert_eq!(unmasked, 0);
    }
}
