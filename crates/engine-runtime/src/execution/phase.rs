use std::fmt;

/// Lifecycle of one masking run. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Nothing resolved yet.
    Pending,
    /// Catalog resolved, query built, start time recorded.
    Planned,
    Running,
    Finished,
    /// Planning failed; no chunk was touched.
    Aborted,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::Pending => "pending",
            JobPhase::Planned => "planned",
            JobPhase::Running => "running",
            JobPhase::Finished => "finished",
            JobPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
