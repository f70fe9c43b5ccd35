//! Filesystem utilities.

use envsmith_types::{EnvsmithError, FileStore, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Expand path with a leading tilde.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Return `candidate`, or the first `candidate-N` for which `exists` is false.
pub fn unique_path(candidate: PathBuf, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(&candidate) {
        return candidate;
    }

    let base = candidate.as_os_str().to_string_lossy().into_owned();
    (1..)
        .map(|n| PathBuf::from(format!("{}-{}", base, n)))
        .find(|p| !exists(p))
        .unwrap_or(candidate)
}

/// [`FileStore`] backed by the local filesystem.
///
/// Writes go to the file in place (open, truncate, write, fsync) so a
/// read-only target fails loudly instead of being silently replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    /// Create a new local store.
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for LocalFileStore {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .map_err(|e| EnvsmithError::Target(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = File::create(path)
            .map_err(|e| EnvsmithError::Target(format!("Failed to open {} for writing: {}", path.display(), e)))?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| EnvsmithError::Target(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                EnvsmithError::Target(format!("Failed to create directory {}: {}", parent.display(), e))
            })?;
        }

        fs::copy(from, to).map(|_| ()).map_err(|e| {
            EnvsmithError::Target(format!(
                "Failed to copy {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }
}
