//! # envsmith Types
//!
//! Core types, traits, and enums shared across all envsmith crates.
//!
//! This crate provides:
//!
//! - Validated identifiers for variable and service names
//! - Closed enums for directive kinds, prompt types and generation types
//! - The `FileStore` and `Prompter` seams used by the file processor
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use envsmith_types::{GenerateType, VarName};
//!
//! let name = VarName::new("API_KEY").unwrap();
//! assert_eq!(name.as_str(), "API_KEY");
//!
//! assert_eq!(GenerateType::from_token("b64"), Some(GenerateType::Base64));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{EnvsmithError, Result};
pub use identifiers::{ServiceName, VarName};
pub use enums::{DirectiveKind, GenerateType, LogLevel, PromptType};
pub use traits::{FileStore, Prompter};
