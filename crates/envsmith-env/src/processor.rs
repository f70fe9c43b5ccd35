//! File processor: turns one template into a live target file.
//!
//! Per file:
//!
//! ```text
//! NotStarted -> Copying (target absent) -> Parsing -> per variable -> Done | Failed
//! ```
//!
//! A variable failure marks the file failed but never stops the remaining
//! variables. A file failure never stops the remaining files.

use crate::context::{FileContext, RunContext};
use crate::generate::{GenerateHandler, GenerateRequest};
use crate::prompt::{PromptHandler, PromptRequest, Resolution};
use crate::report::{FileReport, FileState, Outcome, RunReport, VariableReport};
use crate::target::{current_value, TargetFile};
use envsmith_template::{substitute, DirectiveEntry, DirectiveParams, TemplateFile};
use envsmith_types::{FileStore, Prompter, Result};
use tracing::{debug, error, info};

/// Drives templates through prompting, generation, and target updates.
pub struct FileProcessor<'a> {
    store: &'a dyn FileStore,
    prompter: &'a mut dyn Prompter,
}

impl<'a> FileProcessor<'a> {
    pub fn new(store: &'a dyn FileStore, prompter: &'a mut dyn Prompter) -> Self {
        Self { store, prompter }
    }

    /// Process every file in order.
    ///
    /// When `already_configured` is set nothing is touched and the report is
    /// empty and successful.
    pub fn run<I>(&mut self, ctx: &mut RunContext, files: I, already_configured: bool) -> RunReport
    where
        I: IntoIterator<Item = FileContext>,
    {
        self.run_with_progress(ctx, files, already_configured, |_| {})
    }

    /// [`run`](Self::run), calling `on_file` after each file completes.
    pub fn run_with_progress<I, F>(
        &mut self,
        ctx: &mut RunContext,
        files: I,
        already_configured: bool,
        mut on_file: F,
    ) -> RunReport
    where
        I: IntoIterator<Item = FileContext>,
        F: FnMut(&FileReport),
    {
        let mut run = RunReport::default();
        if already_configured {
            info!("Environment already configured; skipping");
            run.short_circuited = true;
            return run;
        }

        for file in files {
            let report = self.process(ctx, &file);
            on_file(&report);
            run.push(report);
        }

        info!("Processed {} file(s), {} failed", run.processed(), run.failed());
        run
    }

    /// Process a single template/target pair.
    pub fn process(&mut self, ctx: &mut RunContext, file: &FileContext) -> FileReport {
        let mut report = FileReport::new(&file.template, &file.target);
        info!("Processing {}", file.template.display());

        if let Err(e) = self.prepare(ctx, file, &mut report) {
            error!("{}: {}", file.target.display(), e);
            report.state = FileState::Failed;
            report.error = Some(e.to_string());
            return report;
        }

        report.state = if report.failures().next().is_some() {
            FileState::Failed
        } else {
            FileState::Done
        };

        match report.state {
            FileState::Done => info!("Configured {} ({} updated)", file.target.display(), report.updated()),
            _ => error!("Failed to fully configure {}", file.target.display()),
        }
        report
    }

    fn prepare(&mut self, ctx: &mut RunContext, file: &FileContext, report: &mut FileReport) -> Result<()> {
        let template = TemplateFile::read(self.store, &file.template)?;
        let target = TargetFile::new(self.store, &file.target, ctx.backup_dir.clone());

        if !target.exists() {
            report.state = FileState::Copying;
            target.create_from(template.path())?;
        }

        let content = target.read()?;
        let substitution = substitute(&content, &ctx.well_known);
        if substitution.replaced > 0 {
            target.replace_content(&substitution.content)?;
            report.substitutions = substitution.replaced;
        }
        for name in &substitution.unresolved {
            debug!("{}: no well-known value for {{{{{}}}}}", file.target.display(), name);
        }

        report.state = FileState::Parsing;
        let scan = template.scan();
        report.orphans = scan.orphans;

        for entry in &scan.entries {
            let outcome = self.process_entry(ctx, &target, entry);
            if let Outcome::Failed(reason) = &outcome {
                error!("{}: {}", entry.name, reason);
            }
            report.variables.push(VariableReport {
                name: entry.name.to_string(),
                kind: entry.kind,
                outcome,
            });
        }

        Ok(())
    }

    fn process_entry(&mut self, ctx: &mut RunContext, target: &TargetFile<'_>, entry: &DirectiveEntry) -> Outcome {
        match self.resolve_entry(ctx, target, entry) {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    fn resolve_entry(
        &mut self,
        ctx: &mut RunContext,
        target: &TargetFile<'_>,
        entry: &DirectiveEntry,
    ) -> Result<Outcome> {
        let name = entry.name.as_str();
        let params = DirectiveParams::parse(entry.kind, &entry.params);
        params.log_warnings(name);

        let current = current_value(&target.read()?, name);
        let current = current.as_deref().unwrap_or_default();

        let resolution = match &params {
            DirectiveParams::Prompt(prompt) => {
                let shown = if current.is_empty() { entry.example.as_str() } else { current };
                let request = PromptRequest {
                    name,
                    description: &entry.description,
                    params: prompt,
                    current: shown,
                };
                PromptHandler::new(ctx.non_interactive).resolve(self.prompter, &request)?
            }
            DirectiveParams::Generate(generate) => {
                let request = GenerateRequest {
                    name,
                    description: &entry.description,
                    params: generate,
                    current,
                    example: &entry.example,
                };
                GenerateHandler::new(ctx.non_interactive, ctx.generator).resolve(self.prompter, &request)?
            }
        };

        let value = match resolution {
            Resolution::Unchanged => {
                debug!("{}: skipped", name);
                return Ok(Outcome::Skipped);
            }
            Resolution::Value(value) => value,
        };

        let outcome = if target.update(name, &value)? {
            info!("{}: updated", name);
            Outcome::Updated
        } else {
            debug!("{}: unchanged", name);
            Outcome::Unchanged
        };

        if ctx.should_export(name) {
            ctx.export(name, &value);
        }

        Ok(outcome)
    }
}
