use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::Command;

/// Open `initial` in the user's editor (`$EDITOR`, fallback `vi`) and return
/// the saved text.
pub fn edit_text(initial: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    edit_text_with(&editor, initial)
}

/// The buffer lives in a `NamedTempFile`, so it is removed on every exit
/// path — normal save, editor failure, or interrupt — when the guard drops.
fn edit_text_with(editor: &str, initial: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("adoflow-plan-")
        .suffix(".md")
        .tempfile()
        .context("failed to create temporary plan buffer")?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    let status = Command::new(editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("failed to launch editor '{editor}'"))?;

    if !status.success() {
        bail!("editor '{editor}' exited with {status}");
    }

    let edited = std::fs::read_to_string(file.path())?;
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_round_trip_returns_saved_text() {
        // `true` leaves the buffer untouched, so the initial text comes back
        let text = edit_text_with("true", "## Acceptance Criteria\nac\n").unwrap();
        assert!(text.contains("Acceptance Criteria"));
    }

    #[test]
    fn failing_editor_is_an_error() {
        assert!(edit_text_with("false", "x").is_err());
    }

    #[test]
    fn missing_editor_is_an_error() {
        assert!(edit_text_with("definitely-not-a-real-editor-xyz", "x").is_err());
    }
}
