//! Logging system for envsmith.
//!
//! One stderr layer filtered through `RUST_LOG` (or the verbosity chosen on
//! the command line), plus one non-blocking file layer per configured
//! [`LogConfig`] output.

use envsmith_types::config::{LogConfig, LogFormat};
use envsmith_types::{EnvsmithError, LogLevel, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps file writers flushing until dropped. Hold it for the life of `main`.
#[must_use = "dropping the guards stops file logging"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Initialize logging.
///
/// `default_directive` is used when `RUST_LOG` is unset or invalid.
pub fn init(default_directive: &str, outputs: &[LogConfig]) -> Result<LogGuards> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_filter(filter)
        .boxed()];
    let mut guards = Vec::new();

    for output in outputs {
        if output.level == LogLevel::None {
            continue;
        }

        let path = render_log_path(&output.path);
        let (dir, file_name) = split_log_path(&path)?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| EnvsmithError::Config(format!("Failed to create log directory {}: {}", dir.display(), e)))?;

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, file_name));
        guards.push(guard);

        let level = level_filter(output.level);
        let base = fmt::layer().with_writer(writer).with_ansi(false);
        let layer = match output.format {
            LogFormat::Pretty => base.pretty().with_filter(level).boxed(),
            LogFormat::Json => base.json().with_filter(level).boxed(),
            LogFormat::Compact => base.compact().with_filter(level).boxed(),
        };
        layers.push(layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| EnvsmithError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(LogGuards { _guards: guards })
}

/// Map an envsmith log level onto a tracing level filter.
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Expand chrono `%` specifiers in a log path template.
///
/// An invalid specifier leaves the template untouched.
pub fn render_log_path(template: &str) -> PathBuf {
    let mut rendered = String::new();
    match write!(rendered, "{}", chrono::Local::now().format(template)) {
        Ok(()) => PathBuf::from(rendered),
        Err(_) => PathBuf::from(template),
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, std::ffi::OsString)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EnvsmithError::Config(format!("Log path has no file name: {}", path.display())))?
        .to_os_string();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => crate::util::fs::expand_path(parent),
        _ => PathBuf::from("."),
    };

    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_log_path() {
        let rendered = render_log_path("/var/log/envsmith-%Y.log");
        let text = rendered.to_string_lossy();
        assert!(text.starts_with("/var/log/envsmith-2"));
        assert!(!text.contains('%'));

        assert_eq!(render_log_path("plain.log"), PathBuf::from("plain.log"));
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "run.log");

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(level_filter(LogLevel::None), LevelFilter::OFF);
    }
}
