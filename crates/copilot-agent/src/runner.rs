use std::time::{Duration, Instant};

use crate::process::CopilotProcess;
use crate::types::ExecOptions;
use crate::{ExecError, Result};

// ─── ExecOutcome ──────────────────────────────────────────────────────────

/// The terminal result of a completed agent execution.
#[derive(Debug)]
pub struct ExecOutcome {
    /// Everything the agent wrote to stdout, newline-joined.
    pub output: String,
    pub duration: Duration,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Drive a single Copilot execution to completion.
///
/// Spawns the subprocess, accumulates stdout, and waits for exit. The whole
/// run is bounded by `opts.timeout_minutes`; on elapse the child is killed
/// and [`ExecError::Timeout`] is returned, carrying the configured minutes.
pub async fn execute(prompt: &str, opts: &ExecOptions) -> Result<ExecOutcome> {
    let mut process = CopilotProcess::spawn(prompt, opts)?;
    let started = Instant::now();

    match tokio::time::timeout(opts.timeout(), drain(&mut process)).await {
        Ok(result) => {
            let output = result?;
            Ok(ExecOutcome {
                output,
                duration: started.elapsed(),
            })
        }
        Err(_) => {
            process.kill().await;
            Err(ExecError::Timeout {
                minutes: opts.timeout_minutes,
            })
        }
    }
}

/// Check that the `copilot` binary is reachable on PATH.
///
/// Fatal configuration error: callers must invoke this before composing any
/// prompt so the failure is surfaced without a network round trip.
pub fn ensure_available(path_to_executable: Option<&str>) -> Result<()> {
    let exe = path_to_executable.unwrap_or("copilot");
    which::which(exe)
        .map(|_| ())
        .map_err(|_| ExecError::CopilotUnavailable)
}

// ─── Internal ─────────────────────────────────────────────────────────────

/// Consume stdout until EOF, then check the exit status.
async fn drain(process: &mut CopilotProcess) -> Result<String> {
    let mut output = String::new();
    while let Some(line) = process.next_line().await? {
        tracing::debug!(line = %line, "agent output");
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }

    if let Some(exit_err) = process.wait_exit_error().await {
        return Err(exit_err);
    }

    Ok(output)
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;

    async fn run_mock(script: &str, timeout: Duration) -> Result<ExecOutcome> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        let mut process = CopilotProcess::spawn_command(cmd).unwrap();
        let started = Instant::now();

        match tokio::time::timeout(timeout, drain(&mut process)).await {
            Ok(result) => Ok(ExecOutcome {
                output: result?,
                duration: started.elapsed(),
            }),
            Err(_) => {
                process.kill().await;
                Err(ExecError::Timeout { minutes: 1 })
            }
        }
    }

    #[tokio::test]
    async fn accumulates_multiline_output() {
        let outcome = run_mock("printf 'plan line 1\\nplan line 2\\n'", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.output, "plan line 1\nplan line 2");
    }

    #[tokio::test]
    async fn outcome_reports_elapsed_wall_time() {
        let outcome = run_mock("sleep 0.2; echo done", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(outcome.duration >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn failure_exit_maps_to_process_error() {
        let err = run_mock("echo oops >&2; exit 1", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Process(_)));
        assert!(err.to_string().contains("oops"));
    }

    #[tokio::test]
    async fn slow_process_is_classified_as_timeout() {
        let err = run_mock("sleep 30", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        // Timeout is a distinct classification from transport failure
        assert!(err.to_string().contains("minutes"));
    }

    #[test]
    fn ensure_available_accepts_a_shell_builtin_binary() {
        // `sh` exists everywhere these tests run
        assert!(ensure_available(Some("sh")).is_ok());
        assert!(matches!(
            ensure_available(Some("definitely-not-a-real-binary-xyz")),
            Err(ExecError::CopilotUnavailable)
        ));
    }
}
