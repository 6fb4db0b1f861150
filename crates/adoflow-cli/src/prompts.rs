//! Stage prompt templates. The agent — not this program — performs the
//! retrieval, editing, building, and version-control work these prompts
//! describe; the templates are the whole behavioral contract for each stage.

use adoflow_core::workspace::WorkItemRef;
use chrono::Utc;

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Plan generation: fetch the work item and emit the structured plan.
/// Persistence is a separate prompt so the human review loop sits between.
pub fn plan_generation(item: &WorkItemRef, project: &str) -> String {
    let id = item.id;
    format!(
        r#"You are a technical planning assistant. Your task is to:
1. Retrieve work item #{id} from Azure DevOps project "{project}"
2. Create a detailed implementation plan and output it as markdown

Required Plan Structure:
1. # COPILOT PLAN (top-level header)
2. ## User Story - What the user wants, the story of the work item
3. ## Technical Implementation - Search project, find correct places for development, create abstract development plan
   - Include file paths and class names. Method signatures are helpful but not required.
   - Mid-level detail: architectural components, key classes/files to modify, new files to create, dependencies to add.
4. ## Acceptance Criteria - Detailed, testable criteria
   - Use testable/measurable criteria. Given-When-Then format is preferred but not required.
5. ## Test Paths - Manual testing steps to verify the requirement
   - Focus on manual testing steps. Automated test suggestions can be mentioned briefly.

Instructions:
1. Use the Azure DevOps MCP server to retrieve work item #{id} from project "{project}"
2. Use the filesystem MCP server to analyze the project structure
3. Output only the plan, following the structure above, in the section order given
4. Keep the plan under 2000 tokens (~1000 words)
5. Be specific and actionable, and keep it concise
6. If the work item is already closed or done, say so explicitly at the top of the User Story section
7. Do NOT save or comment anything yet; the plan will be reviewed first
"#
    )
}

/// Persist an accepted plan: idempotent comment update plus state advance.
pub fn plan_persistence(item: &WorkItemRef, project: &str, plan_text: &str) -> String {
    let id = item.id;
    let ts = timestamp();
    format!(
        r#"Save the reviewed implementation plan below to Azure DevOps work item #{id} in project "{project}".

Instructions:
1. Check the work item's comments for an existing '# COPILOT PLAN' comment; update it if found, create a new comment if not — never duplicate it
2. Prefix the comment with the '# COPILOT PLAN' tag
3. Add the line: 'Generated on {ts} UTC'
4. Update the work item state to 'Active' (or 'In Progress' or 'Committed' if 'Active' is not valid)
5. Do NOT change assigned user, iteration, or any other field — only the comment and state

Plan to save:

{plan_text}
"#
    )
}

/// Implementation: read the persisted plan, branch, build, test, PR.
pub fn develop(item: &WorkItemRef, project: &str) -> String {
    let id = item.id;
    let branch = item.branch_name();
    let ts = timestamp();
    format!(
        r#"You are a senior software developer. Your task is to implement the feature for work item #{id}.

Instructions:
1. Retrieve work item #{id} from Azure DevOps project "{project}" and read its '# COPILOT PLAN' comment
2. Verify the plan contains both a 'Technical Implementation' and an 'Acceptance Criteria' section; if either is missing, report the failure and stop
3. Create branch '{branch}' and do all work on it
4. Follow the Technical Implementation section to guide your development
5. Write clean, maintainable code following project conventions
6. Create unit tests covering all acceptance criteria
7. Run the project's build and test procedures; fix failures and retry, at most 3 fix cycles
8. Commit changes to '{branch}' with message: "feat: #{id} implementation"

Requirements:
- Follow the technical implementation plan precisely
- Write tests as you implement features
- Include error handling and validation
- Verify all acceptance criteria are met
- Keep commits atomic and meaningful

After implementation:
1. Run the full test suite and verify the build succeeds
2. Push '{branch}' to origin
3. Create a PR in Azure DevOps linked to work item #{id}

Be thorough and ensure a high quality implementation.
Generated on {ts} UTC
"#
    )
}

/// Review: rubric evaluation with bounded auto-remediation; never merges.
pub fn review(item: &WorkItemRef, project: &str) -> String {
    let id = item.id;
    let branch = item.branch_name();
    let ts = timestamp();
    format!(
        r#"You are a senior code reviewer. Your task is to review the implementation for work item #{id} on branch '{branch}'.

Preconditions:
1. Verify branch '{branch}' exists and has at least one commit; if not, report the failure and stop immediately

Review Focus Areas, in priority order:
1. Security - injection attacks, authentication/authorization issues, data exposure
2. Correctness - implementation matches requirements and handles edge cases
3. Test coverage - adequate unit tests, integration tests, critical path coverage
4. Performance - bottlenecks, inefficient algorithms, memory leaks
5. Code quality and style - maintainability, readability, project conventions
6. Documentation - public APIs and non-obvious decisions documented

Instructions:
1. Retrieve work item #{id} from Azure DevOps project "{project}" and read its '# COPILOT PLAN' comment
2. Enumerate all files changed on '{branch}' relative to the main branch
3. Run the project's static analysis tooling
4. Classify every finding as Critical, Major, or Minor
5. Fix Critical and Major findings yourself, re-running checks and committing each fix; at most 3 fix iterations — if findings remain after that, stop and report them for manual intervention
6. When no Critical or Major findings remain: update the PR description and the work item with a review summary, and move the work item to 'In Review' (or the closest equivalent state)
7. Never merge the PR

Output Format:
For each finding, provide severity, file and line number(s), a description, and the fix applied or suggested.

Summary:
- Overall assessment (Approved, Approved with minor comments, Request changes)
- Remaining findings, if any
- Test coverage assessment

Generated on {ts} UTC
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn item(id: u32) -> WorkItemRef {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let item = WorkItemRef::new(id, tmp.path()).unwrap();
        // The prompt builders only read id/branch; the directory may go away.
        drop(tmp);
        item
    }

    #[test]
    fn plan_prompt_names_all_four_sections_in_order() {
        let prompt = plan_generation(&item(7), "Contoso");
        assert!(prompt.contains("#7"));
        assert!(prompt.contains("\"Contoso\""));

        let positions: Vec<usize> = [
            "## User Story",
            "## Technical Implementation",
            "## Acceptance Criteria",
            "## Test Paths",
        ]
        .iter()
        .map(|s| prompt.find(s).unwrap_or_else(|| panic!("missing {s}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn plan_generation_defers_persistence() {
        let prompt = plan_generation(&item(7), "Contoso");
        assert!(prompt.contains("Do NOT save"));
    }

    #[test]
    fn persistence_prompt_is_idempotent_and_embeds_the_plan() {
        let prompt = plan_persistence(&item(9), "Contoso", "# COPILOT PLAN\nbody");
        assert!(prompt.contains("update it if found"));
        assert!(prompt.contains("never duplicate"));
        assert!(prompt.contains("'Active'"));
        assert!(prompt.contains("'In Progress' or 'Committed'"));
        assert!(prompt.contains("# COPILOT PLAN\nbody"));
    }

    #[test]
    fn develop_prompt_names_branch_and_commit_message() {
        let prompt = develop(&item(42), "Contoso");
        assert!(prompt.contains("feature/42"));
        assert!(prompt.contains("feat: #42 implementation"));
        assert!(prompt.contains("at most 3 fix cycles"));
    }

    #[test]
    fn review_prompt_orders_the_rubric_and_bounds_iterations() {
        let prompt = review(&item(42), "Contoso");
        let positions: Vec<usize> = [
            "Security",
            "Correctness",
            "Test coverage",
            "Performance",
            "Code quality",
            "Documentation",
        ]
        .iter()
        .map(|s| prompt.find(s).unwrap_or_else(|| panic!("missing {s}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(prompt.contains("Critical, Major, or Minor"));
        assert!(prompt.contains("at most 3 fix iterations"));
        assert!(prompt.contains("Never merge"));
    }
}
