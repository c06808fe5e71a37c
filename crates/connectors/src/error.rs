use thiserror::Error;

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

/// Errors from a schema metadata source.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Metadata source unavailable: {0}")]
    Unavailable(String),

    #[error("Field set '{field_set}' is not defined for dataset '{dataset}'")]
    UnknownFieldSet { dataset: String, field_set: String },

    #[error("Failed to parse field metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}

/// Errors from the persistent contact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached; worth another attempt.
    #[error("Contact store unavailable: {0}")]
    Unavailable(String),

    #[error("Record '{0}' does not exist in the contact store")]
    RecordNotFound(String),

    #[error("Contact store rejected the write: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize records: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}

impl StoreError {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::Io(_) => true,
            StoreError::Postgres(err) => {
                if err.is_closed() {
                    return true;
                }
                match err.code() {
                    // connection exceptions, serialization failures, deadlocks
                    Some(code) => {
                        let code = code.code();
                        code.starts_with("08") || code == "40001" || code == "40P01"
                    }
                    None => true,
                }
            }
            _ => false,
        }
    }
}

/// Errors from the application log sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write log entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize log entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the report delivery channel.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notification endpoint answered with status {0}")]
    Rejected(u16),

    #[error("Notification not delivered after {0} attempts")]
    AttemptsExhausted(usize),
}

impl NotificationError {
    /// Client errors other than timeout and throttling fail the same way on
    /// every attempt.
    pub fn is_permanent(&self) -> bool {
        match self {
            NotificationError::Rejected(status) => {
                (400..500).contains(status) && *status != 408 && *status != 429
            }
            _ => false,
        }
    }
}
