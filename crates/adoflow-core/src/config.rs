use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FlowError, Result};

pub const CONFIG_DIR: &str = ".adoflow";
pub const CONFIG_FILE: &str = "config.yaml";

// ---------------------------------------------------------------------------
// ConfigField
// ---------------------------------------------------------------------------

/// The values the tool needs before it can compose a toolset declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    /// Azure DevOps organization name.
    Organization,
    /// Azure DevOps project name.
    Project,
    /// Azure DevOps PAT handed to the issue-tracker MCP server.
    AdoToken,
    /// Token authorizing the Copilot CLI itself.
    CopilotToken,
}

impl ConfigField {
    pub fn prompt_text(&self) -> &'static str {
        match self {
            ConfigField::Organization => "Enter Azure DevOps organization name:",
            ConfigField::Project => "Enter Azure DevOps project name:",
            ConfigField::AdoToken => "Azure DevOps PAT not found. Please enter your PAT:",
            ConfigField::CopilotToken => "Copilot token not found. Please enter your token:",
        }
    }
}

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ConfigValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ado_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copilot_token: Option<String>,
}

/// Per-user credential and organization store, `~/.adoflow/config.yaml`.
///
/// Resolution is layered: the on-disk file is consulted first, then the
/// caller-supplied prompt, and freshly prompted values are written back so
/// the next run doesn't ask again. Concurrent invocations are last-writer-wins;
/// no locking.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    values: ConfigValues,
}

impl CredentialStore {
    /// Load from the fixed per-user location. A missing file is not an error.
    pub fn open_default() -> Result<Self> {
        let home = home::home_dir().ok_or(FlowError::HomeNotFound)?;
        Self::load(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.is_file() {
            let raw = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&raw)?
        } else {
            ConfigValues::default()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, field: ConfigField) -> Option<&str> {
        match field {
            ConfigField::Organization => self.values.organization.as_deref(),
            ConfigField::Project => self.values.project.as_deref(),
            ConfigField::AdoToken => self.values.ado_token.as_deref(),
            ConfigField::CopilotToken => self.values.copilot_token.as_deref(),
        }
    }

    /// Return the stored value, or ask for it and persist the answer.
    ///
    /// `ask` only runs when the field is absent from the store. Blank answers
    /// are re-asked and never written back, and a stored empty string counts
    /// as absent, so a useless credential can't wedge itself into the file.
    pub fn resolve<F>(&mut self, field: ConfigField, mut ask: F) -> Result<String>
    where
        F: FnMut(ConfigField) -> std::io::Result<String>,
    {
        if let Some(value) = self.get(field).filter(|v| !v.is_empty()) {
            return Ok(value.to_string());
        }

        let value = loop {
            let answer = ask(field)?.trim().to_string();
            if !answer.is_empty() {
                break answer;
            }
            tracing::warn!("empty value entered; asking again");
        };
        self.set(field, value.clone());
        self.save()?;
        tracing::info!(path = %self.path.display(), "saved configuration value");
        Ok(value)
    }

    fn set(&mut self, field: ConfigField, value: String) {
        let slot = match field {
            ConfigField::Organization => &mut self.values.organization,
            ConfigField::Project => &mut self.values.project,
            ConfigField::AdoToken => &mut self.values.ado_token,
            ConfigField::CopilotToken => &mut self.values.copilot_token,
        };
        *slot = Some(value);
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_yaml::to_string(&self.values)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
