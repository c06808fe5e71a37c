pub mod error;
pub mod execution;

pub use execution::executor::{JobOutcome, MaskingJob, run_masking_job};
