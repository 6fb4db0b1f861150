use std::path::Path;

use anyhow::Result;

use adoflow_core::agent::AgentRole;

use crate::stage::Stage;
use crate::{interact, prompts};

const REVIEW_TIMEOUT_MINUTES: u64 = 30;

/// The rubric, severity classification, and fix-iteration ceiling all live in
/// the prompt: the agent performs the judgment, this stage only reports it.
pub fn run(
    work_item_id: u32,
    directory: &Path,
    model: Option<&str>,
    copilot_bin: Option<&str>,
) -> Result<()> {
    println!("Reviewing work item #{work_item_id}...");

    let stage = Stage::prepare(
        AgentRole::Reviewer,
        work_item_id,
        directory,
        model,
        REVIEW_TIMEOUT_MINUTES,
        copilot_bin,
    )?;

    let outcome = stage.execute(&prompts::review(&stage.item, &stage.project))?;

    interact::show_panel("Review Results", &outcome.output);
    println!("Review completed");
    Ok(())
}
