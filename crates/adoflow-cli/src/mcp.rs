//! Toolset declaration for the Copilot subprocess: a filesystem MCP server
//! scoped to the working directory and an Azure DevOps MCP server scoped to
//! the organization. Both are forwarded verbatim; their internal schemas are
//! the servers' business.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use adoflow_core::config::{ConfigField, CredentialStore};
use adoflow_core::FlowError;
use copilot_agent::McpServerConfig;

use crate::interact;

/// Build the two-server toolset declaration, prompting for and persisting
/// any missing credentials.
pub fn build_toolset(
    working_directory: &Path,
    store: &mut CredentialStore,
) -> Result<Vec<McpServerConfig>> {
    // Both servers are spawned through npx; without Node.js there is no toolset.
    which::which("npx").map_err(|_| FlowError::NpxUnavailable)?;

    let org = store
        .resolve(ConfigField::Organization, ask)
        .context("failed to resolve Azure DevOps organization")?;
    let pat = store
        .resolve(ConfigField::AdoToken, ask)
        .context("failed to resolve Azure DevOps PAT")?;

    Ok(vec![
        McpServerConfig {
            name: "filesystem".into(),
            command: "npx".into(),
            args: vec![
                "-y".into(),
                "@modelcontextprotocol/server-filesystem".into(),
                working_directory.display().to_string(),
            ],
            env: HashMap::new(),
        },
        McpServerConfig {
            name: "azure-devops".into(),
            command: "npx".into(),
            args: vec![
                "-y".into(),
                "@azure-devops/mcp".into(),
                org,
                "--authentication".into(),
                "envvar".into(),
            ],
            env: HashMap::from([("ADO_MCP_AUTH_TOKEN".into(), pat)]),
        },
    ])
}

/// Environment handed to the Copilot subprocess itself: its own authorization
/// token, separate from the issue-tracker PAT.
pub fn agent_env(store: &mut CredentialStore) -> Result<HashMap<String, String>> {
    let token = store
        .resolve(ConfigField::CopilotToken, ask)
        .context("failed to resolve Copilot token")?;
    Ok(HashMap::from([("GH_TOKEN".into(), token)]))
}

fn ask(field: ConfigField) -> std::io::Result<String> {
    interact::prompt_line(field.prompt_text())
}
