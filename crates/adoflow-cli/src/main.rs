mod cmd;
mod editor;
mod interact;
mod mcp;
mod prompts;
mod stage;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "adoflow",
    about = "Azure DevOps work item lifecycle automation — plan, develop, and review with Copilot agents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the copilot binary (default: resolve `copilot` from PATH)
    #[arg(long, global = true, env = "ADOFLOW_COPILOT_BIN", hide = true)]
    copilot_bin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a work item with an AI-generated implementation plan
    Plan {
        /// Azure DevOps work item ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        work_item_id: u32,

        /// Working directory
        #[arg(short = 'd', long, default_value = ".")]
        directory: PathBuf,

        /// Accept the generated plan without interactive review
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Implement a feature based on the work item's plan
    Develop {
        /// Azure DevOps work item ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        work_item_id: u32,

        /// Working directory
        #[arg(short = 'd', long, default_value = ".")]
        directory: PathBuf,

        /// Run the review stage after a successful implementation
        #[arg(short = 'r', long)]
        with_review: bool,

        /// Model override (e.g. gpt-5-mini, gpt-4)
        #[arg(short = 'm', long)]
        model: Option<String>,
    },

    /// Review code changes for a work item before PR merge
    Review {
        /// Azure DevOps work item ID
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        work_item_id: u32,

        /// Working directory
        #[arg(short = 'd', long, default_value = ".")]
        directory: PathBuf,

        /// Model override (e.g. gpt-5-mini, gpt-4)
        #[arg(short = 'm', long)]
        model: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let copilot_bin = cli.copilot_bin.as_deref();

    let result = match cli.command {
        Commands::Plan {
            work_item_id,
            directory,
            yes,
        } => cmd::plan::run(work_item_id, &directory, yes, copilot_bin),
        Commands::Develop {
            work_item_id,
            directory,
            with_review,
            model,
        } => cmd::develop::run(
            work_item_id,
            &directory,
            with_review,
            model.as_deref(),
            copilot_bin,
        ),
        Commands::Review {
            work_item_id,
            directory,
            model,
        } => cmd::review::run(work_item_id, &directory, model.as_deref(), copilot_bin),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
