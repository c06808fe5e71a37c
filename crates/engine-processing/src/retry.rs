use connectors::error::StoreError;
use engine_core::retry::RetryDisposition;

pub fn classify_store_error(err: &StoreError) -> RetryDisposition {
    if err.is_transient() {
        RetryDisposition::Retry
    } else {
        RetryDisposition::Stop
    }
}
