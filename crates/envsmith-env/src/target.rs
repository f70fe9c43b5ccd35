//! Target file mutation with backup and restore.
//!
//! Every write to a target is preceded by a timestamped backup. When the
//! write fails the backup is copied back, so a target is never left
//! half-written.

use envsmith_core::time::backup_stamp;
use envsmith_core::util::unique_path;
use envsmith_types::{bail, EnvsmithError, FileStore, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const BOM: &str = "\u{feff}";

/// Value of the first `NAME=` line, if any.
pub fn current_value(content: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    content
        .strip_prefix(BOM)
        .unwrap_or(content)
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(str::to_string)
}

/// Replace every `NAME=` line with `NAME=value`, or append one when the
/// name is absent. The value is inserted literally.
pub fn set_value(content: &str, name: &str, value: &str) -> String {
    let prefix = format!("{}=", name);
    let mut output = String::with_capacity(content.len() + value.len() + name.len() + 2);
    let mut replaced = false;

    let content = match content.strip_prefix(BOM) {
        Some(rest) => {
            output.push_str(BOM);
            rest
        }
        None => content,
    };

    for line in content.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        if body.starts_with(prefix.as_str()) {
            output.push_str(&prefix);
            output.push_str(value);
            output.push_str(ending);
            replaced = true;
        } else {
            output.push_str(line);
        }
    }

    if !replaced {
        if !output.is_empty() && output != BOM && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&prefix);
        output.push_str(value);
        output.push('\n');
    }

    output
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Where a backup of `target` taken now would go, avoiding names `store`
/// already holds.
pub fn backup_path(store: &dyn FileStore, target: &Path, backup_dir: Option<&Path>) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_string());
    let name = format!("{}.bak.{}", file_name, backup_stamp(chrono::Local::now()));

    let dir = match backup_dir {
        Some(dir) => dir.to_path_buf(),
        None => target.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    unique_path(dir.join(name), |p| store.exists(p))
}

/// A target file reached through a [`FileStore`].
pub struct TargetFile<'a> {
    store: &'a dyn FileStore,
    path: PathBuf,
    backup_dir: Option<PathBuf>,
}

impl<'a> TargetFile<'a> {
    pub fn new(store: &'a dyn FileStore, path: impl Into<PathBuf>, backup_dir: Option<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
            backup_dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.store.exists(&self.path)
    }

    /// Create the target as a byte-for-byte copy of `template`.
    pub fn create_from(&self, template: &Path) -> Result<()> {
        debug!("Creating {} from {}", self.path.display(), template.display());
        self.store.copy(template, &self.path).map_err(|e| {
            EnvsmithError::Target(format!(
                "Failed to create {} from {}: {}",
                self.path.display(),
                template.display(),
                e
            ))
        })
    }

    pub fn read(&self) -> Result<String> {
        self.store.read(&self.path)
    }

    /// Copy the target to a fresh backup path.
    pub fn backup(&self) -> Result<PathBuf> {
        let backup = backup_path(self.store, &self.path, self.backup_dir.as_deref());
        self.store.copy(&self.path, &backup).map_err(|e| {
            EnvsmithError::Target(format!("Failed to back up {}: {}", self.path.display(), e))
        })?;
        debug!("Backed up {} to {}", self.path.display(), backup.display());
        Ok(backup)
    }

    /// Copy a backup over the target.
    pub fn restore(&self, backup: &Path) -> Result<()> {
        self.store.copy(backup, &self.path)
    }

    /// Back up, then write. A failed write is rolled back from the backup.
    pub fn replace_content(&self, content: &str) -> Result<PathBuf> {
        let backup = self.backup()?;

        if let Err(write_err) = self.store.write(&self.path, content) {
            return match self.restore(&backup) {
                Ok(()) => Err(EnvsmithError::Target(format!(
                    "Failed to write {} (restored from backup): {}",
                    self.path.display(),
                    write_err
                ))),
                Err(restore_err) => {
                    error!(
                        "Restore of {} from {} failed: {}",
                        self.path.display(),
                        backup.display(),
                        restore_err
                    );
                    Err(EnvsmithError::Target(format!(
                        "Failed to write {} ({}), and restoring {} failed: {}",
                        self.path.display(),
                        write_err,
                        backup.display(),
                        restore_err
                    )))
                }
            };
        }

        Ok(backup)
    }

    /// Set `name` to `value`. Returns `false` when the value was already current.
    pub fn update(&self, name: &str, value: &str) -> Result<bool> {
        if value.contains(['\n', '\r']) {
            bail!(Target, "Value for {} contains a line break and cannot be stored", name);
        }

        let content = self.read()?;
        if current_value(&content, name).as_deref() == Some(value) {
            return Ok(false);
        }

        self.replace_content(&set_value(&content, name, value))?;
        Ok(true)
    }
}
