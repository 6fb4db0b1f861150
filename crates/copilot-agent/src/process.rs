use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use crate::types::{build_mcp_config_json, ExecOptions};
use crate::{ExecError, Result};

// ─── CopilotProcess ───────────────────────────────────────────────────────

/// A running `copilot --prompt …` subprocess.
///
/// The prompt and toolset declaration are passed on the command line; output
/// is read line by line from stdout. Stderr is captured in a background task
/// and surfaced on process exit errors.
#[derive(Debug)]
pub(crate) struct CopilotProcess {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    /// Stderr output collected by a background reader task.
    stderr_buf: Arc<Mutex<String>>,
}

impl CopilotProcess {
    /// Spawn the real `copilot` binary with the given prompt and options.
    pub(crate) fn spawn(prompt: &str, opts: &ExecOptions) -> Result<Self> {
        let cmd = build_command(prompt, opts)?;
        Self::from_command(cmd)
    }

    /// Spawn an arbitrary command as a mock Copilot process.
    /// Used in unit tests to inject a command that emits fixed output.
    #[cfg(test)]
    pub(crate) fn spawn_command(cmd: Command) -> Result<Self> {
        Self::from_command(cmd)
    }

    fn from_command(mut cmd: Command) -> Result<Self> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(ExecError::Io)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::Process("stdout not captured".into()))?;

        // Drain stderr into a buffer so it can be attached to exit errors.
        let stderr_buf = Arc::new(Mutex::new(String::new()));
        if let Some(stderr) = child.stderr.take() {
            let buf = Arc::clone(&stderr_buf);
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    if let Ok(mut b) = buf.lock() {
                        if !b.is_empty() {
                            b.push('\n');
                        }
                        b.push_str(&line);
                    }
                }
            });
        }

        let lines = BufReader::new(stdout).lines();
        Ok(Self {
            child,
            lines,
            stderr_buf,
        })
    }

    /// Read the next line of output. Returns `Ok(None)` on EOF.
    pub(crate) async fn next_line(&mut self) -> Result<Option<String>> {
        self.lines.next_line().await.map_err(ExecError::Io)
    }

    /// Wait for the child to exit and return an error if the exit code is
    /// non-zero or the process was killed by a signal. Captured stderr is
    /// included in the error message.
    pub(crate) async fn wait_exit_error(&mut self) -> Option<ExecError> {
        let status = match self.child.wait().await {
            Ok(s) => s,
            Err(e) => return Some(ExecError::Io(e)),
        };

        if status.success() {
            return None;
        }

        let stderr = self
            .stderr_buf
            .lock()
            .ok()
            .map(|b| b.clone())
            .unwrap_or_default();

        let msg = if let Some(code) = status.code() {
            if stderr.is_empty() {
                format!("copilot exited with code {code}")
            } else {
                format!("copilot exited with code {code}\nstderr: {stderr}")
            }
        } else if stderr.is_empty() {
            "copilot terminated by signal".to_string()
        } else {
            format!("copilot terminated by signal\nstderr: {stderr}")
        };

        Some(ExecError::Process(msg))
    }

    /// Kill the subprocess (best-effort; errors are silently ignored).
    pub(crate) async fn kill(&mut self) {
        let _ = self.child.kill().await;
    }
}

// ─── Command builder ──────────────────────────────────────────────────────

fn build_command(prompt: &str, opts: &ExecOptions) -> Result<Command> {
    let exe = opts.path_to_executable.as_deref().unwrap_or("copilot");
    let mut cmd = Command::new(exe);

    if !opts.mcp_servers.is_empty() {
        let json = build_mcp_config_json(&opts.mcp_servers)?;
        cmd.arg("--additional-mcp-config").arg(json);
    }

    // Tool calls are pre-approved: the toolset declaration is the whole
    // permission boundary for a headless run.
    cmd.arg("--yolo");

    cmd.arg("--model").arg(&opts.model);
    cmd.arg("--prompt").arg(prompt);

    if let Some(agent) = &opts.agent_name {
        cmd.arg("--agent").arg(agent);
    }

    if let Some(cwd) = &opts.cwd {
        cmd.current_dir(cwd);
    }

    for (k, v) in &opts.env {
        cmd.env(k, v);
    }

    Ok(cmd)
}
