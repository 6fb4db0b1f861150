use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("copilot CLI not found on PATH: install it before running agent stages")]
    CopilotUnavailable,

    #[error("agent execution timed out after {minutes} minutes")]
    Timeout { minutes: u64 },

    #[error("agent process error: {0}")]
    Process(String),
}

impl ExecError {
    /// True only for the timeout classification, which callers surface
    /// differently from transport failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }
}
