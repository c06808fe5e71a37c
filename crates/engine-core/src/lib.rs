pub mod context;
pub mod error;
pub mod job_info;
pub mod metrics;
pub mod retry;
pub mod state;
