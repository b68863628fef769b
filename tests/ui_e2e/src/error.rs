use crate::driver::DriverError;
use crate::wait::WaitError;

/// Why a workflow action, and with it the enclosing test case, failed.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    #[error("assertion failed: {0}")]
    Assertion(String),
}

impl WorkflowError {
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Whether the case failed on an exhausted wait budget.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WorkflowError::Wait(WaitError::Timeout { .. }))
    }
}
