//! Directive parameter resolution.
//!
//! The bracket list on a directive is a comma-separated bag of tokens. Bad
//! metadata never fails a file: unknown types fall back to the default and
//! out-of-range sizes fall back to [`DEFAULT_SIZE`], each with a warning.

use envsmith_types::{DirectiveKind, GenerateType, PromptType};
use std::fmt;
use tracing::warn;

/// Length used when no valid size is given.
pub const DEFAULT_SIZE: usize = 24;

/// Smallest accepted size.
pub const MIN_SIZE: usize = 1;

/// Largest accepted size.
pub const MAX_SIZE: usize = 256;

/// Literal token marking a directive optional. Case-sensitive.
pub const OPTIONAL_TOKEN: &str = "OPTIONAL";

/// Resolved parameters of a PROMPT directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptParams {
    pub kind: PromptType,
    pub optional: bool,
    pub warnings: Vec<String>,
}

/// Resolved parameters of a GENERATE directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    pub kind: GenerateType,
    pub size: usize,
    pub optional: bool,
    pub warnings: Vec<String>,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            kind: GenerateType::Default,
            size: DEFAULT_SIZE,
            optional: false,
            warnings: Vec::new(),
        }
    }
}

/// Parameters of either directive kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveParams {
    Prompt(PromptParams),
    Generate(GenerateParams),
}

/// Tokens shared by both directive kinds.
struct Decoded<T> {
    kind: Option<T>,
    size: Option<usize>,
    optional: bool,
    warnings: Vec<String>,
}

fn decode<T: Copy + fmt::Display>(
    raw: &str,
    directive: DirectiveKind,
    lookup: impl Fn(&str) -> Option<T>,
) -> Decoded<T> {
    let mut decoded = Decoded {
        kind: None,
        size: None,
        optional: false,
        warnings: Vec::new(),
    };
    // An unknown word claims the type slot so later unknown words are ignored.
    let mut claimed_by_unknown = false;

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token == OPTIONAL_TOKEN {
            decoded.optional = true;
            continue;
        }

        if let Some(kind) = lookup(token) {
            if let Some(previous) = decoded.kind {
                decoded
                    .warnings
                    .push(format!("{} type '{}' replaces earlier type '{}'", directive, kind, previous));
            }
            decoded.kind = Some(kind);
            continue;
        }

        if token.chars().all(|c| c.is_ascii_digit()) {
            decoded.size = Some(resolve_size(token, &mut decoded.warnings));
            continue;
        }

        if decoded.kind.is_none() && !claimed_by_unknown {
            claimed_by_unknown = true;
            decoded
                .warnings
                .push(format!("Unknown {} type '{}'; using the default", directive, token));
        } else {
            decoded
                .warnings
                .push(format!("Ignoring unrecognized {} parameter '{}'", directive, token));
        }
    }

    decoded
}

fn resolve_size(token: &str, warnings: &mut Vec<String>) -> usize {
    match token.parse::<usize>() {
        Ok(size) if (MIN_SIZE..=MAX_SIZE).contains(&size) => size,
        _ => {
            warnings.push(format!(
                "Size {} is outside {}..={}; using {}",
                token, MIN_SIZE, MAX_SIZE, DEFAULT_SIZE
            ));
            DEFAULT_SIZE
        }
    }
}

impl PromptParams {
    /// Resolve the raw bracket content of a PROMPT directive.
    pub fn parse(raw: &str) -> Self {
        let mut decoded = decode(raw, DirectiveKind::Prompt, PromptType::from_token);
        if decoded.size.is_some() {
            decoded
                .warnings
                .push("Size has no meaning for PROMPT and is ignored".to_string());
        }

        Self {
            kind: decoded.kind.unwrap_or_default(),
            optional: decoded.optional,
            warnings: decoded.warnings,
        }
    }
}

impl GenerateParams {
    /// Resolve the raw bracket content of a GENERATE directive.
    pub fn parse(raw: &str) -> Self {
        let decoded = decode(raw, DirectiveKind::Generate, GenerateType::from_token);
        Self {
            kind: decoded.kind.unwrap_or_default(),
            size: decoded.size.unwrap_or(DEFAULT_SIZE),
            optional: decoded.optional,
            warnings: decoded.warnings,
        }
    }

    /// Parameters for a one-off generation request, size clamped into range.
    pub fn new(kind: GenerateType, size: usize) -> Self {
        let mut warnings = Vec::new();
        let size = resolve_size(&size.to_string(), &mut warnings);
        Self {
            kind,
            size,
            optional: false,
            warnings,
        }
    }
}

impl DirectiveParams {
    /// Resolve parameters for a directive kind.
    pub fn parse(kind: DirectiveKind, raw: &str) -> Self {
        match kind {
            DirectiveKind::Prompt => DirectiveParams::Prompt(PromptParams::parse(raw)),
            DirectiveKind::Generate => DirectiveParams::Generate(GenerateParams::parse(raw)),
        }
    }

    pub fn optional(&self) -> bool {
        match self {
            DirectiveParams::Prompt(p) => p.optional,
            DirectiveParams::Generate(g) => g.optional,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            DirectiveParams::Prompt(p) => &p.warnings,
            DirectiveParams::Generate(g) => &g.warnings,
        }
    }

    /// Emit every resolution warning through the log, tagged with the variable.
    pub fn log_warnings(&self, variable: &str) {
        for warning in self.warnings() {
            warn!("{}: {}", variable, warning);
        }
    }
}
