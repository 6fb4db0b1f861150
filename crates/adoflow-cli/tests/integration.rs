use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn adoflow() -> Command {
    Command::cargo_bin("adoflow").unwrap()
}

fn git_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn help_lists_the_three_stages() {
    adoflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("develop"))
        .stdout(predicate::str::contains("review"));
}

#[test]
fn work_item_id_must_be_positive() {
    let dir = git_dir();
    adoflow()
        .args(["plan", "0", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("0"));
}

#[test]
fn work_item_id_must_be_numeric() {
    adoflow().args(["develop", "abc"]).assert().failure();
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[test]
fn plan_refuses_a_non_git_directory() {
    let dir = TempDir::new().unwrap();
    adoflow()
        .args(["plan", "7", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn plan_refuses_a_missing_directory() {
    adoflow()
        .args(["plan", "7", "-d", "/definitely/not/a/real/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

// ---------------------------------------------------------------------------
// Agent document resolution
// ---------------------------------------------------------------------------

#[test]
fn missing_planner_document_lists_all_searched_directories() {
    let dir = git_dir();
    adoflow()
        .args(["plan", "7", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("planner.agent.md"))
        .stderr(predicate::str::contains(".github/agents"))
        .stderr(predicate::str::contains("docs/agents"));
}

#[test]
fn missing_reviewer_document_names_the_role() {
    let dir = git_dir();
    adoflow()
        .args(["review", "7", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reviewer.agent.md"));
}

#[test]
fn resolver_failure_happens_before_the_gateway_check() {
    // Even with a bogus copilot binary configured, the missing agent
    // document is the error that surfaces.
    let dir = git_dir();
    adoflow()
        .args(["develop", "7", "-d"])
        .arg(dir.path())
        .env("ADOFLOW_COPILOT_BIN", "/definitely/not/copilot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("developer.agent.md"));
}

#[test]
fn unavailable_copilot_binary_is_a_fatal_configuration_error() {
    let dir = git_dir();
    let agents = dir.path().join("agents");
    std::fs::create_dir_all(&agents).unwrap();
    std::fs::write(agents.join("planner.agent.md"), "You are a planner.\n").unwrap();

    adoflow()
        .args(["plan", "7", "-d"])
        .arg(dir.path())
        .env("ADOFLOW_COPILOT_BIN", "/definitely/not/copilot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("copilot CLI not found"));
}
