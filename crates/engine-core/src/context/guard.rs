use crate::context::env::EnvironmentKind;

/// Decides whether a run may overwrite data at all. Masking only happens in
/// a non-production environment or for a test invocation; anywhere else the
/// chunks pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingGuard {
    pub environment: EnvironmentKind,
    pub test_invocation: bool,
}

impl MaskingGuard {
    pub fn new(environment: EnvironmentKind, test_invocation: bool) -> Self {
        Self {
            environment,
            test_invocation,
        }
    }

    pub fn allows_masking(&self) -> bool {
        self.environment == EnvironmentKind::Sandbox || self.test_invocation
    }
}
