//! Run summaries.

use colored::Colorize;
use envsmith_core::term::{failure, rule, success, warning};
use envsmith_env::{FileReport, Outcome, RunReport};

/// Print one line per file followed by the run totals.
pub fn print_run(report: &RunReport, elapsed: &str) {
    if report.short_circuited {
        println!("{}", success("Environment already configured (ENV_CONFIGURED); nothing to do"));
        return;
    }

    for file in &report.files {
        print_file(file);
    }

    println!("{}", rule());
    let totals = format!("{} processed, {} failed ({})", report.processed(), report.failed(), elapsed);
    if report.succeeded() {
        println!("{}", success(&totals));
    } else {
        println!("{}", failure(&totals));
    }
}

fn print_file(file: &FileReport) {
    let target = file.target.display().to_string();

    if file.succeeded() {
        let unchanged = file.count(|o| *o == Outcome::Unchanged);
        let skipped = file.count(|o| *o == Outcome::Skipped);
        let mut detail = format!("{} updated, {} unchanged, {} skipped", file.updated(), unchanged, skipped);
        if file.substitutions > 0 {
            detail.push_str(&format!(", {} substituted", file.substitutions));
        }
        println!("{}", success(&format!("{} ({})", target.bold(), detail)));
    } else {
        println!("{}", failure(&target.bold().to_string()));
        if let Some(error) = &file.error {
            println!("    {}", error);
        }
        for variable in file.failures() {
            if let Outcome::Failed(reason) = &variable.outcome {
                println!("    {} {}: {}", "-".red(), variable.name.cyan(), reason);
            }
        }
    }

    for orphan in &file.orphans {
        println!(
            "    {}",
            warning(&format!(
                "line {}: {} directive has no variable",
                orphan.line, orphan.directive.kind
            ))
        );
    }
}
