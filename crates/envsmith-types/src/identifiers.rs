//! Type-safe identifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{EnvsmithError, Result};

static VAR_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid variable name pattern"));

/// A validated environment variable name.
///
/// Variable names must match `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Example
///
/// ```
/// use envsmith_types::VarName;
///
/// let name = VarName::new("DB_PASSWORD").unwrap();
/// assert_eq!(name.as_str(), "DB_PASSWORD");
///
/// assert!(VarName::new("1BAD").is_err());
/// assert!(VarName::new("WITH-DASH").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarName(String);

impl VarName {
    /// Create a new validated variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name doesn't match the variable-name grammar.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Self::is_valid(name) {
            return Err(EnvsmithError::Validation(format!(
                "Invalid variable name '{}': must start with a letter or underscore \
                and contain only letters, digits, and underscores",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        VAR_NAME_RE.is_match(name)
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VarName {
    type Err = EnvsmithError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for VarName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated service directory name.
///
/// Service names must:
/// - Start with an ASCII letter or digit
/// - Contain only ASCII letters, digits, `-`, `_` and `.`
///
/// # Example
///
/// ```
/// use envsmith_types::ServiceName;
///
/// let svc = ServiceName::new("home-assistant").unwrap();
/// assert_eq!(svc.as_str(), "home-assistant");
///
/// assert!(ServiceName::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Create a new validated service name.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Self::is_valid(name) {
            return Err(EnvsmithError::Validation(format!(
                "Invalid service name '{}': must start with a letter or digit \
                and contain only letters, digits, '-', '_' and '.'",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        if !first.is_ascii_alphanumeric() {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceName {
    type Err = EnvsmithError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
