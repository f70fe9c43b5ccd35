//! `{{NAME}}` placeholder substitution for well-known installation values.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("valid placeholder pattern"));

/// Installation-wide values keyed by name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellKnown {
    values: IndexMap<String, String>,
}

impl WellKnown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect values for `names` from a lookup. Unset and empty values are skipped.
    pub fn from_lookup<F>(names: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = names
            .iter()
            .filter_map(|name| {
                lookup(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.clone(), value))
            })
            .collect();
        Self { values }
    }

    /// Collect values for `names` from the process environment.
    pub fn from_env(names: &[String]) -> Self {
        Self::from_lookup(names, |name| std::env::var(name).ok())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of one substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Content after substitution
    pub content: String,
    /// Number of placeholders replaced
    pub replaced: usize,
    /// Distinct placeholder names left in place, in first-seen order
    pub unresolved: Vec<String>,
}

/// Replace `{{NAME}}` with its well-known value. Unknown names stay verbatim.
pub fn substitute(content: &str, well_known: &WellKnown) -> Substitution {
    let mut replaced = 0;
    let mut unresolved: Vec<String> = Vec::new();

    let output = PLACEHOLDER_RE.replace_all(content, |caps: &Captures| {
        let name = &caps[1];
        match well_known.get(name) {
            Some(value) => {
                replaced += 1;
                value.to_string()
            }
            None => {
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
                caps[0].to_string()
            }
        }
    });

    if replaced > 0 {
        debug!("Substituted {} placeholder(s)", replaced);
    }

    Substitution {
        content: output.into_owned(),
        replaced,
        unresolved,
    }
}
