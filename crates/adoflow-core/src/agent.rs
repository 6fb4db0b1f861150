use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{FlowError, Result};

// ---------------------------------------------------------------------------
// AgentRole
// ---------------------------------------------------------------------------

/// The three roles a stage can run under. Each role maps to exactly one
/// instruction document name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Planner,
    Developer,
    Reviewer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::Developer => "developer",
            AgentRole::Reviewer => "reviewer",
        }
    }

    /// The instruction document filename for this role.
    pub fn file_name(&self) -> String {
        format!("{}.agent.md", self.as_str())
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AgentDocument
// ---------------------------------------------------------------------------

/// One role's instruction document, loaded from disk. Immutable once loaded.
#[derive(Debug)]
pub struct AgentDocument {
    pub role: AgentRole,
    pub source_path: PathBuf,
    pub content: String,
    pub loaded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// AgentResolver
// ---------------------------------------------------------------------------

/// Ordered candidate directories, relative to the working directory.
/// Earlier entries win.
pub const SEARCH_PATHS: [&str; 4] = [".github/agents", "agents", "docs/agents", "."];

/// The chosen document location plus any lower-precedence copies it shadows.
#[derive(Debug)]
pub struct Located {
    pub path: PathBuf,
    pub shadowed: Vec<PathBuf>,
}

/// Locates and loads instruction documents, caching per role.
///
/// One resolver is owned by one CLI invocation; the cache is never shared
/// across processes. Repeated `resolve` calls for the same role return the
/// identical `Arc` without re-reading the filesystem.
pub struct AgentResolver {
    working_directory: PathBuf,
    cache: HashMap<AgentRole, Arc<AgentDocument>>,
}

impl AgentResolver {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            cache: HashMap::new(),
        }
    }

    /// Resolve the instruction document for `role`, first-match-wins across
    /// [`SEARCH_PATHS`]. Shadowed copies in later directories produce a
    /// warning, not an error.
    pub fn resolve(&mut self, role: AgentRole) -> Result<Arc<AgentDocument>> {
        if let Some(doc) = self.cache.get(&role) {
            return Ok(Arc::clone(doc));
        }

        let located = locate(role, &self.working_directory)?;
        for path in &located.shadowed {
            tracing::warn!(
                role = %role,
                chosen = %located.path.display(),
                shadowed = %path.display(),
                "ignoring lower-precedence agent document"
            );
        }

        let content = std::fs::read_to_string(&located.path)?;
        let doc = Arc::new(AgentDocument {
            role,
            source_path: located.path,
            content,
            loaded_at: Utc::now(),
        });
        self.cache.insert(role, Arc::clone(&doc));
        Ok(doc)
    }
}

/// Scan every candidate directory for `role`'s document.
///
/// Returns the earliest match and the full list of shadowed alternatives.
/// Fails with [`FlowError::AgentNotFound`] naming all searched directories
/// when no candidate contains the file.
pub fn locate(role: AgentRole, working_directory: &Path) -> Result<Located> {
    let file_name = role.file_name();
    let mut matches: Vec<PathBuf> = Vec::new();

    for search_path in SEARCH_PATHS {
        let candidate = working_directory.join(search_path).join(&file_name);
        if candidate.is_file() {
            matches.push(candidate);
        }
    }

    let mut iter = matches.into_iter();
    match iter.next() {
        Some(path) => Ok(Located {
            path,
            shadowed: iter.collect(),
        }),
        None => Err(FlowError::AgentNotFound {
            role,
            file: file_name,
            searched: SEARCH_PATHS
                .iter()
                .map(|p| working_directory.join(p).display().to_string())
                .collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_doc(root: &Path, dir: &str, role: AgentRole, content: &str) {
        let dir = root.join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(role.file_name()), content).unwrap();
    }

    #[test]
    fn earliest_search_path_wins_regardless_of_content() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "agents", AgentRole::Developer, "generic");
        write_doc(tmp.path(), ".github/agents", AgentRole::Developer, "github");

        let mut resolver = AgentResolver::new(tmp.path());
        let doc = resolver.resolve(AgentRole::Developer).unwrap();
        assert_eq!(doc.content, "github");
        assert!(doc.source_path.ends_with(".github/agents/developer.agent.md"));
    }

    #[test]
    fn duplicate_documents_are_reported_as_shadowed() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), ".github/agents", AgentRole::Developer, "a");
        write_doc(tmp.path(), "docs/agents", AgentRole::Developer, "b");

        let located = locate(AgentRole::Developer, tmp.path()).unwrap();
        assert!(located.path.ends_with(".github/agents/developer.agent.md"));
        assert_eq!(located.shadowed.len(), 1);
        assert!(located.shadowed[0].ends_with("docs/agents/developer.agent.md"));
    }

    #[test]
    fn working_directory_root_is_a_valid_location() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), ".", AgentRole::Reviewer, "root reviewer");

        let mut resolver = AgentResolver::new(tmp.path());
        let doc = resolver.resolve(AgentRole::Reviewer).unwrap();
        assert_eq!(doc.content, "root reviewer");
    }

    #[test]
    fn cache_returns_the_identical_document_even_after_disk_change() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "agents", AgentRole::Planner, "v1");

        let mut resolver = AgentResolver::new(tmp.path());
        let first = resolver.resolve(AgentRole::Planner).unwrap();

        // Mutate the file on disk; the cached document must not change.
        write_doc(tmp.path(), "agents", AgentRole::Planner, "v2");
        let second = resolver.resolve(AgentRole::Planner).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.content, "v1");
    }

    #[test]
    fn missing_document_lists_every_searched_directory() {
        let tmp = TempDir::new().unwrap();
        let mut resolver = AgentResolver::new(tmp.path());
        let err = resolver.resolve(AgentRole::Planner).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("planner"));
        for dir in SEARCH_PATHS {
            if dir != "." {
                assert!(msg.contains(dir), "missing {dir} in: {msg}");
            }
        }
    }

    #[test]
    fn roles_resolve_independently() {
        let tmp = TempDir::new().unwrap();
        write_doc(tmp.path(), "agents", AgentRole::Planner, "p");
        write_doc(tmp.path(), "agents", AgentRole::Reviewer, "r");

        let mut resolver = AgentResolver::new(tmp.path());
        assert_eq!(resolver.resolve(AgentRole::Planner).unwrap().content, "p");
        assert_eq!(resolver.resolve(AgentRole::Reviewer).unwrap().content, "r");
        assert!(resolver.resolve(AgentRole::Developer).is_err());
    }
}
