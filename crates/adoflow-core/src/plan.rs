use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// PlanSection
// ---------------------------------------------------------------------------

/// The named sections a generated plan may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSection {
    UserStory,
    TechnicalImplementation,
    AcceptanceCriteria,
    TestPaths,
}

impl PlanSection {
    pub fn title(&self) -> &'static str {
        match self {
            PlanSection::UserStory => "User Story",
            PlanSection::TechnicalImplementation => "Technical Implementation",
            PlanSection::AcceptanceCriteria => "Acceptance Criteria",
            PlanSection::TestPaths => "Test Paths",
        }
    }
}

/// Sections that must be present for a plan to be valid, in reporting order.
pub const REQUIRED_SECTIONS: [PlanSection; 2] = [
    PlanSection::TechnicalImplementation,
    PlanSection::AcceptanceCriteria,
];

// ---------------------------------------------------------------------------
// PlanDocument
// ---------------------------------------------------------------------------

/// The parsed result of an agent-generated plan.
///
/// Parsing is a pure function of the text: sections are extracted by fuzzy
/// heading match, everything else is ignored, and re-parsing `full_text`
/// yields the same document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    pub full_text: String,
    pub user_story: Option<String>,
    pub technical_implementation: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub test_paths: Option<String>,
}

impl PlanDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            full_text: content.to_string(),
            user_story: extract_section(content, PlanSection::UserStory.title()),
            technical_implementation: extract_section(
                content,
                PlanSection::TechnicalImplementation.title(),
            ),
            acceptance_criteria: extract_section(content, PlanSection::AcceptanceCriteria.title()),
            test_paths: extract_section(content, PlanSection::TestPaths.title()),
        }
    }

    pub fn section(&self, section: PlanSection) -> Option<&str> {
        match section {
            PlanSection::UserStory => self.user_story.as_deref(),
            PlanSection::TechnicalImplementation => self.technical_implementation.as_deref(),
            PlanSection::AcceptanceCriteria => self.acceptance_criteria.as_deref(),
            PlanSection::TestPaths => self.test_paths.as_deref(),
        }
    }

    /// A plan is valid iff both required sections are present and non-blank.
    /// User Story and Test Paths are informational only.
    pub fn is_valid(&self) -> bool {
        self.missing_required_sections().is_empty()
    }

    /// Required sections absent or blank after trimming, in fixed order:
    /// Technical Implementation before Acceptance Criteria.
    pub fn missing_required_sections(&self) -> Vec<&'static str> {
        REQUIRED_SECTIONS
            .iter()
            .filter(|s| {
                self.section(**s)
                    .map(|body| body.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|s| s.title())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Section extraction
// ---------------------------------------------------------------------------

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("valid heading regex"))
}

/// Extract the body of the first heading whose text starts with
/// `section_title` (case-insensitive, trailing qualifier words allowed).
///
/// The body runs until the next heading of equal-or-higher level, or end of
/// document. Returns `None` when no heading matches.
fn extract_section(content: &str, section_title: &str) -> Option<String> {
    let re = heading_re();
    let lines: Vec<&str> = content.lines().collect();
    let wanted = section_title.to_lowercase();

    let (start, level) = lines.iter().enumerate().find_map(|(i, line)| {
        let caps = re.captures(line)?;
        let text = caps[2].trim().to_lowercase();
        if text.starts_with(&wanted) {
            Some((i, caps[1].len()))
        } else {
            None
        }
    })?;

    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find_map(|(i, line)| {
            let caps = re.captures(line)?;
            (caps[1].len() <= level).then_some(i)
        })
        .unwrap_or(lines.len());

    Some(lines[start + 1..end].join("\n").trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
