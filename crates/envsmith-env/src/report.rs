//! Per-variable, per-file, and per-run outcome reports.

use envsmith_template::OrphanedDirective;
use envsmith_types::DirectiveKind;
use std::path::PathBuf;

/// Outcome for one directive-bound variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new value was written
    Updated,
    /// The resolved value matched what was already there
    Unchanged,
    /// Optional and left alone
    Skipped,
    /// Hard failure with its reason
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReport {
    pub name: String,
    pub kind: DirectiveKind,
    pub outcome: Outcome,
}

/// Processing state of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    NotStarted,
    Copying,
    Parsing,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub template: PathBuf,
    pub target: PathBuf,
    pub state: FileState,
    /// Placeholders replaced by the substitution pass
    pub substitutions: usize,
    pub variables: Vec<VariableReport>,
    pub orphans: Vec<OrphanedDirective>,
    /// File-level failure, if any happened outside a variable
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(template: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
            state: FileState::NotStarted,
            substitutions: 0,
            variables: Vec::new(),
            orphans: Vec::new(),
            error: None,
        }
    }

    /// A file that failed before processing could begin.
    pub fn failed(template: impl Into<PathBuf>, target: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        let mut report = Self::new(template, target);
        report.state = FileState::Failed;
        report.error = Some(reason.into());
        report
    }

    pub fn succeeded(&self) -> bool {
        self.state == FileState::Done
    }

    /// Count variables with the given outcome shape.
    pub fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.variables.iter().filter(|v| predicate(&v.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| *o == Outcome::Updated)
    }

    pub fn failures(&self) -> impl Iterator<Item = &VariableReport> {
        self.variables.iter().filter(|v| v.outcome.is_failure())
    }
}

/// Tally of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    /// Set when the run was skipped because the environment is already configured
    pub short_circuited: bool,
}

impl RunReport {
    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
    }

    pub fn processed(&self) -> usize {
        self.files.len()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.succeeded()).count()
    }

    pub fn succeeded(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tally() {
        let mut run = RunReport::default();
        assert!(run.succeeded());

        let mut ok = FileReport::new("a/.env.example", "a/.env");
        ok.state = FileState::Done;
        run.push(ok);
        run.push(FileReport::failed("b/.env.example", "b/.env", "unreadable"));

        assert_eq!(run.processed(), 2);
        assert_eq!(run.failed(), 1);
        assert!(!run.succeeded());
    }

    #[test]
    fn test_file_counts() {
        let mut report = FileReport::new("t", "u");
        report.variables.push(VariableReport {
            name: "A".into(),
            kind: DirectiveKind::Prompt,
            outcome: Outcome::Updated,
        });
        report.variables.push(VariableReport {
            name: "B".into(),
            kind: DirectiveKind::Generate,
            outcome: Outcome::Failed("entropy".into()),
        });
        assert_eq!(report.updated(), 1);
        assert_eq!(report.failures().count(), 1);
    }
}
