use serde::{Deserialize, Serialize};

/// Pull request body used when no template is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/PULL_REQUEST_TEMPLATE.md");

const BREAKING_YES: &str = "- [ ] Yes (I have stepped the version number accordingly)";
const BREAKING_NO: &str = "- [ ] No";

/// Kinds of change a pull request can declare in its checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    BugFix,
    NewFeature,
    RemovedFeature,
    CodeStyle,
    Refactoring,
    Build,
    Documentation,
}

impl ChangeType {
    pub const ALL: [ChangeType; 7] = [
        ChangeType::BugFix,
        ChangeType::NewFeature,
        ChangeType::RemovedFeature,
        ChangeType::CodeStyle,
        ChangeType::Refactoring,
        ChangeType::Build,
        ChangeType::Documentation,
    ];

    /// Checklist text, as written in the template
    pub fn label(self) -> &'static str {
        match self {
            ChangeType::BugFix => "Bug fix",
            ChangeType::NewFeature => "New feature",
            ChangeType::RemovedFeature => "Removed feature",
            ChangeType::CodeStyle => "Code style update (formatting etc.)",
            ChangeType::Refactoring => "Refactoring (no functional changes, no api changes)",
            ChangeType::Build => "Build related changes",
            ChangeType::Documentation => "Documentation content changes",
        }
    }

    /// Parse a prompt answer such as `125`: every digit 1-7 selects the
    /// matching entry, anything else is ignored.
    pub fn parse_selection(input: &str) -> Vec<ChangeType> {
        let mut selected = Vec::new();
        for c in input.trim().chars() {
            let Some(n) = c.to_digit(10) else { continue };
            if n == 0 {
                continue;
            }
            if let Some(change) = Self::ALL.get(n as usize - 1) {
                if !selected.contains(change) {
                    selected.push(*change);
                }
            }
        }
        selected
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a yes/no prompt answer means yes
pub fn parse_confirmation(input: &str) -> bool {
    matches!(input.trim().to_uppercase().as_str(), "Y" | "YES")
}

/// Fill the checklist of a pull request template
pub fn build_pull_request_body(template: &str, changes: &[ChangeType], breaking: bool) -> String {
    let mut body = template.to_string();

    for change in ChangeType::ALL {
        if changes.contains(&change) {
            let unchecked = format!("- [ ] {}", change.label());
            let checked = format!("- [x] {}", change.label());
            body = body.replace(&unchecked, &checked);
        }
    }

    if breaking {
        body.replace(BREAKING_YES, &BREAKING_YES.replacen("[ ]", "[x]", 1))
    } else {
        body.replace(BREAKING_NO, &BREAKING_NO.replacen("[ ]", "[x]", 1))
    }
}

/// `<branch>: <message>`, used for commits and pull request titles
pub fn commit_message(branch: &str, message: &str) -> String {
    format!("{}: {}", branch, message)
}
