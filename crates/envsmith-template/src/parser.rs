//! Directive grammar parser.
//!
//! Every template line classifies into exactly one [`LineKind`]. A single
//! left-to-right [`scan`] then binds each directive comment to the next live
//! assignment:
//!
//! ```text
//! # GENERATE[hex,32]: Session signing key     <- directive, now pending
//! SESSION_KEY=changeme                         <- bound to the pending directive
//! # PROMPT[email]: Admin address               <- directive, now pending
//! # ADMIN_EMAIL=you@example.com                <- commented assignment clears it
//! ```

use envsmith_types::{DirectiveKind, EnvsmithError, FileStore, Result, VarName};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*(PROMPT|GENERATE)(?:\[([^\]]*)\])?\s*:\s*(.*?)\s*$")
        .expect("valid directive pattern")
});

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("valid assignment pattern"));

static COMMENTED_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("valid commented assignment pattern")
});

/// A directive comment: `# KIND[params]: description`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// PROMPT or GENERATE
    pub kind: DirectiveKind,
    /// Raw bracket content, empty when the bracket list was omitted
    pub params: String,
    /// Text after the colon, trimmed
    pub description: String,
}

/// A `NAME=VALUE` assignment. The value is the raw remainder of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Variable name
    pub name: VarName,
    /// Unparsed value
    pub value: String,
}

/// Classification of a single template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `# PROMPT[...]: ...` or `# GENERATE[...]: ...`
    Directive(Directive),
    /// `NAME=VALUE`
    Assignment(Assignment),
    /// `# NAME=VALUE`
    CommentedAssignment(Assignment),
    /// Blank lines and every other comment or text
    Irrelevant,
}

/// Classify one line of a template.
pub fn classify(line: &str) -> LineKind {
    if let Some(caps) = DIRECTIVE_RE.captures(line) {
        if let Some(kind) = DirectiveKind::from_keyword(&caps[1]) {
            return LineKind::Directive(Directive {
                kind,
                params: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
                description: caps[3].to_string(),
            });
        }
    }

    if let Some(assignment) = capture_assignment(&ASSIGNMENT_RE, line) {
        return LineKind::Assignment(assignment);
    }

    if let Some(assignment) = capture_assignment(&COMMENTED_ASSIGNMENT_RE, line) {
        return LineKind::CommentedAssignment(assignment);
    }

    LineKind::Irrelevant
}

fn capture_assignment(re: &Regex, line: &str) -> Option<Assignment> {
    let caps = re.captures(line)?;
    let name = VarName::new(&caps[1]).ok()?;
    Some(Assignment {
        name,
        value: caps[2].to_string(),
    })
}

/// A directive bound to the variable assignment that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveEntry {
    /// PROMPT or GENERATE
    pub kind: DirectiveKind,
    /// Human-readable description
    pub description: String,
    /// Raw bracket content
    pub params: String,
    /// Variable the directive applies to
    pub name: VarName,
    /// Value the template ships for the variable
    pub example: String,
    /// 1-based line of the directive comment
    pub directive_line: usize,
    /// 1-based line of the assignment
    pub assignment_line: usize,
}

/// Why a directive never got bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
    /// Another directive appeared before any assignment
    Superseded,
    /// The file ended before any assignment
    EndOfFile,
}

/// A directive with no following assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedDirective {
    /// The directive
    pub directive: Directive,
    /// 1-based line of the directive comment
    pub line: usize,
    /// Why it was discarded
    pub reason: OrphanReason,
}

/// A directive deliberately cleared by a commented-out assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedDirective {
    /// The directive
    pub directive: Directive,
    /// 1-based line of the directive comment
    pub line: usize,
    /// Name on the commented-out assignment
    pub name: VarName,
}

/// Result of scanning a whole template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Directive/variable pairs in file order
    pub entries: Vec<DirectiveEntry>,
    /// Directives cleared by `# NAME=VALUE`
    pub cleared: Vec<ClearedDirective>,
    /// Directives that never reached an assignment
    pub orphans: Vec<OrphanedDirective>,
}

/// Content without a leading UTF-8 byte order mark.
fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Scan template content.
pub fn scan(content: &str) -> ScanReport {
    scan_lines(strip_bom(content).lines())
}

/// Scan template lines.
pub fn scan_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> ScanReport {
    let mut report = ScanReport::default();
    let mut pending: Option<(Directive, usize)> = None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_no = index + 1;

        match classify(line) {
            LineKind::Directive(directive) => {
                if let Some((previous, previous_line)) = pending.take() {
                    warn!(
                        "Directive {} on line {} has no assignment before the next directive; discarding",
                        previous.kind, previous_line
                    );
                    report.orphans.push(OrphanedDirective {
                        directive: previous,
                        line: previous_line,
                        reason: OrphanReason::Superseded,
                    });
                }
                pending = Some((directive, line_no));
            }
            LineKind::Assignment(assignment) => {
                if let Some((directive, directive_line)) = pending.take() {
                    report.entries.push(DirectiveEntry {
                        kind: directive.kind,
                        description: directive.description,
                        params: directive.params,
                        name: assignment.name,
                        example: assignment.value,
                        directive_line,
                        assignment_line: line_no,
                    });
                }
            }
            LineKind::CommentedAssignment(assignment) => {
                if let Some((directive, directive_line)) = pending.take() {
                    debug!(
                        "Directive {} on line {} cleared by commented-out {}",
                        directive.kind, directive_line, assignment.name
                    );
                    report.cleared.push(ClearedDirective {
                        directive,
                        line: directive_line,
                        name: assignment.name,
                    });
                }
            }
            LineKind::Irrelevant => {}
        }
    }

    if let Some((directive, line)) = pending {
        warn!("Orphaned {} directive on line {}: no variable follows it", directive.kind, line);
        report.orphans.push(OrphanedDirective {
            directive,
            line,
            reason: OrphanReason::EndOfFile,
        });
    }

    report
}

/// A template file: a path and its raw lines. Never mutated.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    path: PathBuf,
    content: String,
}

impl TemplateFile {
    /// Read a template through a file store.
    pub fn read(store: &dyn FileStore, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !store.exists(path) {
            return Err(EnvsmithError::Template(format!("Template not found: {}", path.display())));
        }

        let content = store
            .read(path)
            .map_err(|e| EnvsmithError::Template(format!("Failed to read template {}: {}", path.display(), e)))?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Template path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw lines in file order, byte order mark removed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        strip_bom(&self.content).lines()
    }

    /// Scan the template for directive/variable pairs.
    pub fn scan(&self) -> ScanReport {
        scan_lines(self.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name(s: &str) -> VarName {
        VarName::new(s).unwrap()
    }

    #[test]
    fn test_classify_directive() {
        match classify("# GENERATE[hex,8,OPTIONAL]: Session key ") {
            LineKind::Directive(d) => {
                assert_eq!(d.kind, DirectiveKind::Generate);
                assert_eq!(d.params, "hex,8,OPTIONAL");
                assert_eq!(d.description, "Session key");
            }
            other => panic!("expected directive, got {:?}", other),
        }

        match classify("#PROMPT: Your name") {
            LineKind::Directive(d) => {
                assert_eq!(d.kind, DirectiveKind::Prompt);
                assert_eq!(d.params, "");
                assert_eq!(d.description, "Your name");
            }
            other => panic!("expected directive, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_assignments() {
        assert_eq!(
            classify("DB_URL=postgres://u:p@h/db?x=1"),
            LineKind::Assignment(Assignment {
                name: name("DB_URL"),
                value: "postgres://u:p@h/db?x=1".to_string(),
            })
        );
        assert_eq!(
            classify("EMPTY="),
            LineKind::Assignment(Assignment {
                name: name("EMPTY"),
                value: String::new(),
            })
        );
        assert_eq!(
            classify("# ALT_PORT=8080"),
            LineKind::CommentedAssignment(Assignment {
                name: name("ALT_PORT"),
                value: "8080".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_irrelevant() {
        assert_eq!(classify(""), LineKind::Irrelevant);
        assert_eq!(classify("# just a comment"), LineKind::Irrelevant);
        assert_eq!(classify("# PROMPTING: not a directive"), LineKind::Irrelevant);
        assert_eq!(classify("# prompt: lowercase keyword"), LineKind::Irrelevant);
        assert_eq!(classify("9LIVES=cat"), LineKind::Irrelevant);
        assert_eq!(classify(" INDENTED=1"), LineKind::Irrelevant);
    }

    #[test]
    fn test_scan_binds_directives() {
        let report = scan(
            "# Header comment\n\
             # PROMPT[email]: Admin email\n\
             \n\
             ADMIN_EMAIL=admin@example.com\n\
             PLAIN=untouched\n\
             # GENERATE[hex,16]: Secret\n\
             SECRET=changeme\n",
        );

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].name, name("ADMIN_EMAIL"));
        assert_eq!(report.entries[0].params, "email");
        assert_eq!(report.entries[0].example, "admin@example.com");
        assert_eq!(report.entries[0].directive_line, 2);
        assert_eq!(report.entries[0].assignment_line, 4);
        assert_eq!(report.entries[1].kind, DirectiveKind::Generate);
        assert_eq!(report.entries[1].name, name("SECRET"));
        assert!(report.orphans.is_empty());
    }

    #[test]
    fn test_commented_assignment_clears_pending() {
        let report = scan("# PROMPT: Optional alternative\n# ALT=value\nREAL=1\n");
        assert!(report.entries.is_empty());
        assert_eq!(report.cleared.len(), 1);
        assert_eq!(report.cleared[0].name, name("ALT"));
    }

    #[test]
    fn test_orphans_reported() {
        let report = scan("# PROMPT: first\n# GENERATE: second\nKEY=x\n# PROMPT: dangling\n");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].kind, DirectiveKind::Generate);
        assert_eq!(report.orphans.len(), 2);
        assert_eq!(report.orphans[0].reason, OrphanReason::Superseded);
        assert_eq!(report.orphans[0].line, 1);
        assert_eq!(report.orphans[1].reason, OrphanReason::EndOfFile);
        assert_eq!(report.orphans[1].line, 4);
    }

    #[test]
    fn test_crlf_lines() {
        let report = scan("# GENERATE[b64]: key\r\nKEY=abc\r\n");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].example, "abc");
    }

    #[test]
    fn test_byte_order_mark_before_first_directive() {
        let report = scan("\u{feff}# GENERATE[hex,8]: Key\nKEY=changeme\n");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].name, name("KEY"));
        assert_eq!(report.entries[0].directive_line, 1);
        assert!(report.orphans.is_empty());
    }

    proptest! {
        #[test]
        fn prop_classification_is_total(line in "[ -~]{0,80}") {
            // Exactly one variant; classify must never panic.
            let kind = classify(&line);
            let categories = [
                matches!(kind, LineKind::Directive(_)),
                matches!(kind, LineKind::Assignment(_)),
                matches!(kind, LineKind::CommentedAssignment(_)),
                matches!(kind, LineKind::Irrelevant),
            ];
            prop_assert_eq!(categories.iter().filter(|c| **c).count(), 1);
        }

        #[test]
        fn prop_directive_lines_are_directives(
            keyword in prop::sample::select(vec!["PROMPT", "GENERATE"]),
            params in "[a-zA-Z0-9, ]{0,20}",
            description in "[ -~]{0,40}",
        ) {
            let line = format!("# {}[{}]: {}", keyword, params, description);
            match classify(&line) {
                LineKind::Directive(d) => {
                    prop_assert_eq!(d.params, params);
                    prop_assert_eq!(d.description, description.trim());
                }
                other => prop_assert!(false, "expected directive, got {:?}", other),
            }
        }

        #[test]
        fn prop_assignments_keep_raw_value(
            var in "[A-Za-z_][A-Za-z0-9_]{0,20}",
            value in "[ -~]{0,40}",
        ) {
            let line = format!("{}={}", var, value);
            match classify(&line) {
                LineKind::Assignment(a) => {
                    prop_assert_eq!(a.name.as_str(), var.as_str());
                    prop_assert_eq!(a.value, value);
                }
                other => prop_assert!(false, "expected assignment, got {:?}", other),
            }
        }
    }
}
