//! Common enumerations used throughout envsmith.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{EnvsmithError, Result};

/// Log level enumeration for the logging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Detailed trace messages
    Trace,
}

impl FromStr for LogLevel {
    type Err = EnvsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "NONE" => Ok(LogLevel::None),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(EnvsmithError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "NONE"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

/// The two directive keywords a template may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DirectiveKind {
    /// Value is collected from the operator
    Prompt,
    /// Value is generated from a cryptographic random source
    Generate,
}

impl DirectiveKind {
    /// Match the directive keyword exactly as it appears in a template.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "PROMPT" => Some(DirectiveKind::Prompt),
            "GENERATE" => Some(DirectiveKind::Generate),
            _ => None,
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::Prompt => write!(f, "PROMPT"),
            DirectiveKind::Generate => write!(f, "GENERATE"),
        }
    }
}

/// Input kinds for PROMPT directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    /// Free text, pre-filled with the current value
    #[default]
    Plain,
    /// Must look like an email address
    Email,
    /// Collected without echo
    Password,
}

impl PromptType {
    /// Look up a known type token (case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "email" => Some(PromptType::Email),
            "password" | "pw" => Some(PromptType::Password),
            "text" | "plain" => Some(PromptType::Plain),
            _ => None,
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptType::Plain => write!(f, "plain"),
            PromptType::Email => write!(f, "email"),
            PromptType::Password => write!(f, "password"),
        }
    }
}

/// Secret kinds for GENERATE directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateType {
    /// Unspecified type, derived like base64
    #[default]
    Default,
    /// Base64 alphabet with `=`, `+`, `/` stripped
    Base64,
    /// Lowercase hexadecimal
    Hex,
    /// Alphanumeric-safe password
    Password,
    /// `admin:<bcrypt hash>` basic-auth credential
    Bcrypt,
}

impl GenerateType {
    /// Every generation type, in lookup-table order.
    pub const ALL: [GenerateType; 5] = [
        GenerateType::Default,
        GenerateType::Base64,
        GenerateType::Hex,
        GenerateType::Password,
        GenerateType::Bcrypt,
    ];

    /// Look up a known type token (case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "base64" | "b64" => Some(GenerateType::Base64),
            "hex" => Some(GenerateType::Hex),
            "password" | "pw" => Some(GenerateType::Password),
            "bcrypt" => Some(GenerateType::Bcrypt),
            "default" => Some(GenerateType::Default),
            _ => None,
        }
    }
}

impl FromStr for GenerateType {
    type Err = EnvsmithError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
            .ok_or_else(|| EnvsmithError::Validation(format!("Unknown generation type: {}", s)))
    }
}

impl fmt::Display for GenerateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateType::Default => write!(f, "default"),
            GenerateType::Base64 => write!(f, "base64"),
            GenerateType::Hex => write!(f, "hex"),
            GenerateType::Password => write!(f, "password"),
            GenerateType::Bcrypt => write!(f, "bcrypt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_type_aliases() {
        assert_eq!(GenerateType::from_token("b64"), Some(GenerateType::Base64));
        assert_eq!(GenerateType::from_token("BASE64"), Some(GenerateType::Base64));
        assert_eq!(GenerateType::from_token("pw"), Some(GenerateType::Password));
        assert_eq!(GenerateType::from_token("sha256"), None);
    }

    #[test]
    fn test_prompt_type_aliases() {
        assert_eq!(PromptType::from_token("pw"), Some(PromptType::Password));
        assert_eq!(PromptType::from_token("Email"), Some(PromptType::Email));
        assert_eq!(PromptType::from_token("bcrypt"), None);
    }

    #[test]
    fn test_directive_keyword_is_case_sensitive() {
        assert_eq!(DirectiveKind::from_keyword("PROMPT"), Some(DirectiveKind::Prompt));
        assert_eq!(DirectiveKind::from_keyword("prompt"), None);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
