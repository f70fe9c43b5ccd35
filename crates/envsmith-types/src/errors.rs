//! Error types for envsmith operations.

use thiserror::Error;

/// The main error type for envsmith operations.
///
/// Directive metadata problems (unknown type names, out-of-range sizes) are
/// never represented here: they degrade to warnings and defaults. Everything
/// in this enum is a hard failure for the variable or file that raised it.
#[derive(Error, Debug)]
pub enum EnvsmithError {
    /// Configuration-related error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template file could not be read or understood
    #[error("Template error: {0}")]
    Template(String),

    /// Interactive input failed (terminal closed, input aborted)
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A required field received no usable value
    #[error("Required value missing: {0}")]
    RequiredInput(String),

    /// Secret generation failed (entropy source or hash primitive)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Target file could not be created, updated, or restored
    #[error("Target file error: {0}")]
    Target(String),

    /// Service discovery error
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for envsmith operations.
pub type Result<T> = std::result::Result<T, EnvsmithError>;

/// Helper macro to bail out with an EnvsmithError
///
/// # Example
///
/// ```ignore
/// if !valid {
///     bail!(Target, "cannot write {}", path.display());
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::EnvsmithError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::EnvsmithError::$variant(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_with_bail() -> Result<()> {
        bail!(Generation, "entropy source unavailable: {}", "EIO");
    }

    #[test]
    fn test_bail_formats_variant() {
        let err = fails_with_bail().unwrap_err();
        assert!(matches!(err, EnvsmithError::Generation(_)));
        assert_eq!(err.to_string(), "Generation error: entropy source unavailable: EIO");
    }
}
