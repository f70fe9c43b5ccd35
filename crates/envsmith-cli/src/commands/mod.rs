//! CLI command implementations.

pub mod check;
pub mod generate;
pub mod process;
pub mod service;
pub mod version;

use crate::cli::RunOptions;
use crate::ui::{progress, summary};
use anyhow::{bail, Context, Result};
use envsmith_core::config::{ControlFlags, Settings};
use envsmith_core::term::in_controlling_terminal;
use envsmith_core::time::{measure, pretty_duration};
use envsmith_core::util::LocalFileStore;
use envsmith_env::{DialoguerPrompter, FileContext, FileProcessor, FileReport, RunContext};
use tracing::info;

/// Process `files`, print a summary, and fail when any file failed.
///
/// `failed` holds files that could not even be located; they count towards
/// the run total unless the whole run is skipped.
pub fn run_files(settings: &Settings, files: Vec<FileContext>, failed: Vec<FileReport>, opts: &RunOptions) -> Result<()> {
    let env_flags = ControlFlags::from_env();
    let mut non_interactive = opts.non_interactive || env_flags.non_interactive;
    if !non_interactive && !in_controlling_terminal() {
        info!("No terminal attached; running non-interactively");
        non_interactive = true;
    }
    let already_configured = env_flags.already_configured && !opts.force;

    let flags = ControlFlags {
        non_interactive,
        already_configured,
    };
    let mut ctx = RunContext::from_settings(settings, &flags);

    let store = LocalFileStore::new();
    let mut prompter = DialoguerPrompter::new();
    let mut processor = FileProcessor::new(&store, &mut prompter);

    let total = files.len();
    let (mut report, elapsed) = measure(|| {
        if non_interactive && total > 1 {
            let pb = progress::bar(total as u64, "Processing");
            let report = processor.run_with_progress(&mut ctx, files, already_configured, |file| {
                pb.set_message(file.target.display().to_string());
                pb.inc(1);
            });
            pb.finish_and_clear();
            report
        } else {
            processor.run(&mut ctx, files, already_configured)
        }
    });

    if !report.short_circuited {
        report.files.extend(failed);
    }

    summary::print_run(&report, &pretty_duration(elapsed));

    if let Some(path) = &opts.export_file {
        std::fs::write(path, ctx.export_script())
            .with_context(|| format!("Failed to write exports to {}", path.display()))?;
        info!("Wrote exports to {}", path.display());
    }

    if !report.succeeded() {
        bail!("{} of {} file(s) failed", report.failed(), report.processed());
    }
    Ok(())
}
