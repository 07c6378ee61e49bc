use shared::{PathSegment, ValidationIssue};

/// Builds a `Vec<PathSegment>` from string keys and list indices,
/// e.g. `issue_path!["items", 2, "splitters"]`.
macro_rules! issue_path {
    ($($segment:expr),* $(,)?) => {
        vec![$(::shared::PathSegment::from($segment)),*]
    };
}
pub(crate) use issue_path;

/// Every rule violation found in one validation pass
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} validation issue(s): {}", .0.len(), summarize(&.0))]
pub struct ValidationErrors(pub Vec<ValidationIssue>);

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.0
    }

    /// First issue whose path starts at the given top-level field
    pub fn find_at(&self, field: &str) -> Option<&ValidationIssue> {
        self.0.iter().find(|issue| issue.points_at(field))
    }
}

/// Failure to turn raw input into a valid tab
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TabValidationError {
    /// The input is not even shaped like a tab (not an object, or a required
    /// top-level field is missing). Callers show a generic load error.
    #[error("Malformed tab: {0}")]
    Malformed(String),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Collects issues while walking a tab or split
#[derive(Debug, Default)]
pub(crate) struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    pub fn push(&mut self, path: Vec<PathSegment>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.issues)
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.issues))
        }
    }
}
