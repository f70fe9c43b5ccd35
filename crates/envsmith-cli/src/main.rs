//! envsmith CLI entry point.

use clap::Parser;
use colored::Colorize;
use envsmith_core::log;

mod cli;
mod commands;
mod ui;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let settings = cli.load_settings();
    let outputs = settings.as_ref().map(|s| s.logs.clone()).unwrap_or_default();
    let guards = match log::init(cli.log_directive(), &outputs) {
        Ok(guards) => Some(guards),
        Err(e) => {
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            None
        }
    };

    let result = settings.and_then(|settings| cli.execute(&settings));
    drop(guards);

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
