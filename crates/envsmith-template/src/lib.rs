//! Template grammar for envsmith.
//!
//! This crate understands the annotated `.env.example` format:
//! - [`parser`] classifies lines and binds directives to variables
//! - [`params`] resolves the bracket parameter list
//! - [`substitute`] fills `{{NAME}}` placeholders with installation values
//!
//! Nothing here touches a target file; it only reads and describes templates.

pub mod params;
pub mod parser;
pub mod substitute;

pub use params::{DirectiveParams, GenerateParams, PromptParams, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use parser::{
    classify, scan, ClearedDirective, Directive, DirectiveEntry, LineKind, OrphanReason, OrphanedDirective,
    ScanReport, TemplateFile,
};
pub use substitute::{substitute, Substitution, WellKnown};
