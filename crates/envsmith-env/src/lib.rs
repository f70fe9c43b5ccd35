//! # Envsmith Environment
//!
//! Turns annotated templates into live configuration files:
//! - [`processor`] drives each file through substitution, prompting, and generation
//! - [`prompt`] and [`generate`] resolve PROMPT and GENERATE directives
//! - [`target`] edits target files with backup and restore
//! - [`discovery`] maps service names to template paths
//! - [`report`] records per-variable, per-file, and per-run outcomes

#![warn(clippy::all)]

pub mod context;
pub mod discovery;
pub mod generate;
pub mod processor;
pub mod prompt;
pub mod report;
pub mod target;

pub use context::{derive_target, FileContext, RunContext};
pub use discovery::{ServiceDiscovery, ServiceEntry};
pub use generate::GenerateHandler;
pub use processor::FileProcessor;
pub use prompt::{is_valid_email, DialoguerPrompter, PromptHandler, Resolution};
pub use report::{FileReport, FileState, Outcome, RunReport, VariableReport};
pub use target::TargetFile;
