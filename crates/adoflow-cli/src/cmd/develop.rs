use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};

use adoflow_core::agent::AgentRole;

use crate::stage::Stage;
use crate::{interact, prompts};

const DEVELOP_TIMEOUT_MINUTES: u64 = 30;

/// Pause before auto-chaining into review; Ctrl-C skips the review while
/// keeping the completed implementation a success.
const REVIEW_COUNTDOWN: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    work_item_id: u32,
    directory: &Path,
    with_review: bool,
    model: Option<&str>,
    copilot_bin: Option<&str>,
) -> Result<()> {
    println!("Implementing work item #{work_item_id}...");

    let stage = Stage::prepare(
        AgentRole::Developer,
        work_item_id,
        directory,
        model,
        DEVELOP_TIMEOUT_MINUTES,
        copilot_bin,
    )?;

    let outcome = stage.execute(&prompts::develop(&stage.item, &stage.project))?;
    if outcome.output.trim().is_empty() {
        bail!("agent produced no output; implementation cannot be verified");
    }

    interact::show_panel("Implementation Output", &outcome.output);
    println!("Implementation completed");

    if !with_review {
        return Ok(());
    }

    println!(
        "Starting review in {} seconds (Ctrl-C to skip)...",
        REVIEW_COUNTDOWN.as_secs()
    );
    match stage.block_on(countdown(REVIEW_COUNTDOWN)) {
        Countdown::Interrupted => {
            // The implementation already succeeded; skipping review is clean.
            println!("Review skipped");
            Ok(())
        }
        Countdown::Completed => super::review::run(work_item_id, directory, model, copilot_bin),
    }
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Countdown {
    Completed,
    Interrupted,
}

async fn countdown(duration: Duration) -> Countdown {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    countdown_with(ctrl_c, duration).await
}

async fn countdown_with<F: Future<Output = ()>>(cancel: F, duration: Duration) -> Countdown {
    tokio::select! {
        () = cancel => Countdown::Interrupted,
        () = tokio::time::sleep(duration) => Countdown::Completed,
    }
}
