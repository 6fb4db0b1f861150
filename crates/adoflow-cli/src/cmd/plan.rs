use std::path::Path;

use anyhow::{bail, Result};

use adoflow_core::agent::AgentRole;
use adoflow_core::plan::PlanDocument;

use crate::stage::Stage;
use crate::{editor, interact, prompts};

const PLAN_TIMEOUT_MINUTES: u64 = 5;

/// How many times a rejected plan may be regenerated before the stage gives
/// up and asks for manual intervention.
const MAX_REGENERATIONS: u32 = 3;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    work_item_id: u32,
    directory: &Path,
    assume_yes: bool,
    copilot_bin: Option<&str>,
) -> Result<()> {
    println!("Planning work item #{work_item_id}...");

    let stage = Stage::prepare(
        AgentRole::Planner,
        work_item_id,
        directory,
        None,
        PLAN_TIMEOUT_MINUTES,
        copilot_bin,
    )?;

    let Some(plan) = review_loop(&stage, assume_yes)? else {
        // Rejection is a clean termination, not an error.
        return Ok(());
    };

    persist(&stage, &plan)
}

// ---------------------------------------------------------------------------
// Generation and review
// ---------------------------------------------------------------------------

/// Drive generation and the accept/reject/edit loop.
///
/// Returns `Ok(None)` when the user rejected the plan (clean exit 0), the
/// accepted document otherwise.
fn review_loop(stage: &Stage, assume_yes: bool) -> Result<Option<PlanDocument>> {
    let mut regenerations = 0u32;
    let mut plan = generate(stage)?;

    loop {
        if !validity_gate(&plan, assume_yes)? {
            println!("Plan rejected");
            return Ok(None);
        }

        if assume_yes {
            return Ok(Some(plan));
        }

        interact::show_panel("Generated Plan", &plan.full_text);
        match interact::prompt_choice(
            "What would you like to do?",
            &["Accept", "Reject", "Edit"],
        )? {
            0 => {
                println!("Plan accepted");
                return Ok(Some(plan));
            }
            1 => {
                match interact::prompt_choice(
                    "Reject the plan — what next?",
                    &["Regenerate", "Cancel"],
                )? {
                    0 => {
                        if regenerations >= MAX_REGENERATIONS {
                            bail!(
                                "plan regenerated {MAX_REGENERATIONS} times without acceptance; \
                                 manual intervention required"
                            );
                        }
                        regenerations += 1;
                        println!(
                            "Regenerating plan (attempt {regenerations} of {MAX_REGENERATIONS})..."
                        );
                        plan = generate(stage)?;
                    }
                    _ => {
                        println!("Plan rejected");
                        return Ok(None);
                    }
                }
            }
            _ => {
                let edited = editor::edit_text(&plan.full_text)?;
                // Treat the edited text exactly like fresh agent output.
                plan = PlanDocument::parse(&edited);
            }
        }
    }
}

fn generate(stage: &Stage) -> Result<PlanDocument> {
    let outcome = stage.execute(&prompts::plan_generation(&stage.item, &stage.project))?;
    Ok(PlanDocument::parse(&outcome.output))
}

/// Check required sections. Returns `Ok(false)` when the user declines an
/// invalid plan (clean rejection); `-y` accepts invalid plans silently.
fn validity_gate(plan: &PlanDocument, assume_yes: bool) -> Result<bool> {
    let missing = plan.missing_required_sections();
    if missing.is_empty() {
        return Ok(true);
    }

    if assume_yes {
        println!(
            "Warning: plan is missing required sections ({}); accepting anyway (--yes)",
            missing.join(", ")
        );
        return Ok(true);
    }

    println!(
        "The generated plan is missing required sections: {}",
        missing.join(", ")
    );
    Ok(interact::confirm("Accept the plan anyway?", false)?)
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn persist(stage: &Stage, plan: &PlanDocument) -> Result<()> {
    println!("Saving plan to work item #{}...", stage.item.id);
    let outcome = stage.execute(&prompts::plan_persistence(
        &stage.item,
        &stage.project,
        &plan.full_text,
    ))?;

    interact::show_panel("Plan Generation Complete", &outcome.output);
    println!("Plan saved to Azure DevOps");
    Ok(())
}
