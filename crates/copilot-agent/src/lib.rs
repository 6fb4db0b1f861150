//! `copilot-agent` — native Rust driver for the Copilot CLI subprocess.
//!
//! The `adoflow` workspace hands a composed prompt and a toolset declaration
//! (MCP server configs for filesystem and Azure DevOps access) to a headless
//! `copilot` run and collects its output. All of the interesting work —
//! retrieval, code editing, building, testing, version control — happens
//! inside that subprocess; this crate only supervises it.
//!
//! # Architecture
//!
//! ```text
//! ExecOptions
//!     │
//!     ▼
//! CopilotProcess  ← spawns `copilot --additional-mcp-config … --prompt …`
//!     │              reads plain-text lines from stdout
//!     ▼
//! ExecOutcome     ← accumulated output + duration, or a classified ExecError
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use copilot_agent::{execute, ExecOptions};
//!
//! let opts = ExecOptions {
//!     model: "gpt-5-mini".into(),
//!     timeout_minutes: 5,
//!     ..Default::default()
//! };
//! let outcome = execute("say hello", &opts).await?;
//! println!("{}", outcome.output);
//! ```

pub mod error;
pub mod runner;
pub mod types;

pub(crate) mod process;

pub use error::ExecError;
pub use runner::{ensure_available, execute, ExecOutcome};
pub use types::{build_mcp_config_json, ExecOptions, McpServerConfig};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ExecError>;
