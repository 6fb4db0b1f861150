use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};

// ---------------------------------------------------------------------------
// WorkItemRef
// ---------------------------------------------------------------------------

/// An opaque Azure DevOps work item identifier plus a validated working
/// directory. The work item itself is never read or written by this program;
/// the agent does that on instruction.
#[derive(Debug, Clone)]
pub struct WorkItemRef {
    pub id: u32,
    pub directory: PathBuf,
}

impl WorkItemRef {
    pub fn new(id: u32, directory: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            id,
            directory: validate_work_dir(directory.as_ref())?,
        })
    }

    /// Deterministic feature branch name for this work item.
    pub fn branch_name(&self) -> String {
        format!("feature/{}", self.id)
    }
}

/// Validate that the working directory exists and is a git repository.
///
/// The agent performs all actual version-control work; we only refuse to run
/// outside a repository, since every stage's prompt assumes one.
pub fn validate_work_dir(directory: &Path) -> Result<PathBuf> {
    if !directory.is_dir() {
        return Err(FlowError::DirectoryNotFound(
            directory.display().to_string(),
        ));
    }

    let path = directory.canonicalize()?;
    if !path.join(".git").exists() {
        return Err(FlowError::NotAGitRepository(path.display().to_string()));
    }

    Ok(path)
}
