//! CLI structure and command definitions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use envsmith_core::config::{Config, Settings};
use envsmith_template::DEFAULT_SIZE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envsmith")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn annotated .env templates into live configuration files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: ~/.config/envsmith/config.yml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Options shared by every command that processes templates.
#[derive(Args, Clone, Debug, Default)]
pub struct RunOptions {
    /// Never prompt: keep defaults, generate secrets, fail on missing required input
    #[arg(long)]
    pub non_interactive: bool,

    /// Process even when ENV_CONFIGURED is set
    #[arg(long)]
    pub force: bool,

    /// Write exported values as `export NAME='value'` lines to this file
    #[arg(long, value_name = "PATH")]
    pub export_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process template files into their targets
    Process {
        /// Template files (e.g. .env.example)
        #[arg(required = true)]
        templates: Vec<PathBuf>,

        /// Explicit target file (single template only)
        #[arg(short, long)]
        target: Option<PathBuf>,

        #[command(flatten)]
        run: RunOptions,
    },

    /// Discover services by name and process their templates
    Service {
        /// Service names or aliases
        #[arg(required = true)]
        names: Vec<String>,

        /// Services root directory
        #[arg(long)]
        root: Option<PathBuf>,

        #[command(flatten)]
        run: RunOptions,
    },

    /// Process every discovered service
    All {
        /// Services root directory
        #[arg(long)]
        root: Option<PathBuf>,

        #[command(flatten)]
        run: RunOptions,
    },

    /// List discovered services
    Services {
        /// Services root directory
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Parse a template and show its directives without touching any file
    Check {
        /// Template file
        template: PathBuf,
    },

    /// Print one generated secret
    Generate {
        /// Generation type (default, base64, hex, password, bcrypt)
        kind: String,

        /// Length in characters (1-256)
        #[arg(short, long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Log filter directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "envsmith=trace"
        } else if self.verbose {
            "envsmith=debug"
        } else if self.quiet {
            "envsmith=warn"
        } else {
            "envsmith=info"
        }
    }

    /// Load settings from `--config`, else the default path when it exists.
    pub fn load_settings(&self) -> Result<Settings> {
        let config = match &self.config {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Config::load(path)?
            }
            None => {
                let default = Settings::default_path();
                if default.is_file() {
                    Config::load(&default)?
                } else {
                    Config::new()?
                }
            }
        };

        config
            .with_env_overrides(std::env::vars())?
            .settings()
            .context("Invalid configuration")
    }

    pub fn execute(&self, settings: &Settings) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Process { templates, target, run } => {
                process::execute(settings, templates, target.as_deref(), run)
            }
            Commands::Service { names, root, run } => {
                service::execute(settings, names, root.as_deref(), run)
            }
            Commands::All { root, run } => service::all(settings, root.as_deref(), run),
            Commands::Services { root } => service::list(settings, root.as_deref()),
            Commands::Check { template } => check::execute(template),
            Commands::Generate { kind, size } => generate::execute(settings, kind, *size),
            Commands::Version => version::execute(self.verbose, self.config_path().as_deref()),
        }
    }

    fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = Settings::default_path();
                default.is_file().then_some(default)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_directive() {
        let cli = Cli::parse_from(["envsmith", "-q", "version"]);
        assert_eq!(cli.log_directive(), "envsmith=warn");
        let cli = Cli::parse_from(["envsmith", "version", "--debug"]);
        assert_eq!(cli.log_directive(), "envsmith=trace");
    }

    #[test]
    fn test_process_flags() {
        let cli = Cli::parse_from([
            "envsmith",
            "process",
            "a/.env.example",
            "--non-interactive",
            "--export-file",
            "out.sh",
        ]);
        match cli.command {
            Commands::Process { templates, target, run } => {
                assert_eq!(templates, vec![PathBuf::from("a/.env.example")]);
                assert!(target.is_none());
                assert!(run.non_interactive);
                assert!(!run.force);
                assert_eq!(run.export_file, Some(PathBuf::from("out.sh")));
            }
            _ => panic!("expected process"),
        }
    }
}
