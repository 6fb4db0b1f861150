use crate::agent::AgentRole;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(
        "no {role} agent document found ({file}); searched: {}",
        .searched.join(", ")
    )]
    AgentNotFound {
        role: AgentRole,
        file: String,
        searched: Vec<String>,
    },

    #[error("directory does not exist: {0}")]
    DirectoryNotFound(String),

    #[error(
        "not a git repository: {0}. Run from within a git repository or pass -d with a valid one"
    )]
    NotAGitRepository(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("npx not found on PATH: install Node.js to use MCP tool servers")]
    NpxUnavailable,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
