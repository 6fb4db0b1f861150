//! Core domain logic for `adoflow`: agent document discovery, plan parsing,
//! credential storage, and input validation. No agent subprocess I/O lives
//! here — that's `copilot-agent`.

pub mod agent;
pub mod config;
pub mod error;
pub mod plan;
pub mod workspace;

pub use error::{FlowError, Result};
