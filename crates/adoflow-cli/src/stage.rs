//! Shared stage skeleton: every stage resolves its agent document, checks the
//! gateway binary, gathers credentials, and builds the toolset declaration in
//! the same order. Missing agent documents fail before anything is prompted
//! or spawned.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};

use adoflow_core::agent::{AgentDocument, AgentResolver, AgentRole};
use adoflow_core::config::{ConfigField, CredentialStore};
use adoflow_core::workspace::WorkItemRef;
use copilot_agent::{ExecOptions, ExecOutcome};

use crate::{interact, mcp};

const DEFAULT_MODEL: &str = "gpt-5-mini";

pub struct Stage {
    pub item: WorkItemRef,
    pub document: Arc<AgentDocument>,
    pub project: String,
    opts: ExecOptions,
    runtime: tokio::runtime::Runtime,
}

impl Stage {
    pub fn prepare(
        role: AgentRole,
        work_item_id: u32,
        directory: &std::path::Path,
        model: Option<&str>,
        timeout_minutes: u64,
        copilot_bin: Option<&str>,
    ) -> Result<Self> {
        let item = WorkItemRef::new(work_item_id, directory)?;

        let mut resolver = AgentResolver::new(&item.directory);
        let document = resolver.resolve(role)?;
        println!("Found {role} agent: {}", document.source_path.display());

        copilot_agent::ensure_available(copilot_bin)?;

        let mut store = CredentialStore::open_default()?;
        let project = store.resolve(ConfigField::Project, |field| {
            interact::prompt_line(field.prompt_text())
        })?;
        let mcp_servers = mcp::build_toolset(&item.directory, &mut store)?;
        let env = mcp::agent_env(&mut store)?;

        let opts = ExecOptions {
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            agent_name: Some(role.as_str().to_string()),
            mcp_servers,
            cwd: Some(item.directory.clone()),
            env,
            timeout_minutes,
            path_to_executable: copilot_bin.map(str::to_string),
        };

        let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

        Ok(Self {
            item,
            document,
            project,
            opts,
            runtime,
        })
    }

    /// Compose the final prompt (instruction document folded in front of the
    /// task) and drive one gateway execution to completion.
    pub fn execute(&self, task_prompt: &str) -> Result<ExecOutcome> {
        let prompt = format!("{}\n\n{}", self.document.content.trim(), task_prompt);
        tracing::info!(
            role = %self.document.role,
            work_item = self.item.id,
            timeout_minutes = self.opts.timeout_minutes,
            "executing agent"
        );
        let outcome = self
            .runtime
            .block_on(copilot_agent::execute(&prompt, &self.opts))?;
        tracing::info!(
            role = %self.document.role,
            elapsed_secs = outcome.duration.as_secs(),
            "agent execution completed"
        );
        Ok(outcome)
    }

    /// Run an auxiliary future (e.g. the pre-review countdown) on the stage's
    /// runtime.
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}
