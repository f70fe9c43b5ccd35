//! Core trait definitions for envsmith seams.

use std::path::Path;
use crate::errors::Result;

/// Trait for the storage backend that template and target files live on.
///
/// The file processor never touches the filesystem directly; every read,
/// write, copy and restore goes through this trait.
pub trait FileStore {
    /// Read a whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the contents of a file in place.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Copy a file byte-for-byte, creating or truncating the destination.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Trait for talking to the human operator.
///
/// Implementations decide how input is collected; the prompt handler owns
/// validation, defaults and retry policy.
pub trait Prompter {
    /// Ask for a line of free text.
    ///
    /// `default` is pre-filled when non-empty. Returns the entered text, or
    /// an empty string when the operator gave no input and no default.
    fn text(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Ask for a value without echoing it to the terminal.
    fn secret(&mut self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Show a short status or validation message.
    fn notify(&mut self, message: &str);

    /// Show a secret exactly once. The value must never be persisted.
    ///
    /// An error means the operator may not have seen it; callers must not
    /// store anything derived from the secret in that case.
    fn reveal(&mut self, label: &str, secret: &str) -> Result<()>;
}
