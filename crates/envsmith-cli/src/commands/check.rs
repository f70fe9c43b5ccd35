//! Parse a template and report what a run would do with it.

use anyhow::{Context, Result};
use colored::Colorize;
use envsmith_core::term::warning;
use envsmith_core::util::LocalFileStore;
use envsmith_template::{DirectiveParams, OrphanReason, TemplateFile};
use std::path::Path;

pub fn execute(template: &Path) -> Result<()> {
    let store = LocalFileStore::new();
    let template = TemplateFile::read(&store, template).context("Failed to read template")?;
    let scan = template.scan();

    println!("{} {}", "Checking".green().bold(), template.path().display());

    if scan.entries.is_empty() {
        println!("  {} No directives found", "!".yellow());
    }

    for entry in &scan.entries {
        let params = DirectiveParams::parse(entry.kind, &entry.params);
        let resolved = match &params {
            DirectiveParams::Prompt(p) => format!("type={}", p.kind),
            DirectiveParams::Generate(g) => format!("type={} size={}", g.kind, g.size),
        };
        let optional = if params.optional() { " optional" } else { "" };

        println!(
            "  {:>4}  {:<8} {:<24} {}{}",
            entry.assignment_line,
            entry.kind.to_string().cyan(),
            entry.name.as_str().bold(),
            resolved,
            optional.dimmed()
        );
        if !entry.description.is_empty() {
            println!("        {}", entry.description.dimmed());
        }
        for message in params.warnings() {
            println!("        {}", warning(message));
        }
    }

    for cleared in &scan.cleared {
        println!(
            "  {}",
            warning(&format!(
                "line {}: {} directive cleared by commented-out {}",
                cleared.line, cleared.directive.kind, cleared.name
            ))
        );
    }

    for orphan in &scan.orphans {
        let reason = match orphan.reason {
            OrphanReason::Superseded => "followed by another directive",
            OrphanReason::EndOfFile => "no variable before end of file",
        };
        println!(
            "  {}",
            warning(&format!("line {}: orphaned {} directive ({})", orphan.line, orphan.directive.kind, reason))
        );
    }

    Ok(())
}
