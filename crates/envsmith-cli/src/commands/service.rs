//! Service discovery commands.

use crate::cli::RunOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use envsmith_core::config::Settings;
use envsmith_env::{FileReport, ServiceDiscovery};
use std::path::Path;

fn discovery(settings: &Settings, root: Option<&Path>) -> ServiceDiscovery {
    let discovery = ServiceDiscovery::from_settings(settings);
    match root {
        Some(root) => discovery.with_root(root),
        None => discovery,
    }
}

/// Process named services. Unknown names count as failed files.
pub fn execute(settings: &Settings, names: &[String], root: Option<&Path>, opts: &RunOptions) -> Result<()> {
    let discovery = discovery(settings, root);

    let mut files = Vec::new();
    let mut failed = Vec::new();

    for name in names {
        match discovery.find(name) {
            Some(entry) => match entry.file_context() {
                Ok(file) => files.push(file),
                Err(e) => failed.push(FileReport::failed(&entry.template, &entry.template, e.to_string())),
            },
            None => failed.push(FileReport::failed(
                name,
                name,
                format!("Service '{}' not found under {}", name, discovery.root().display()),
            )),
        }
    }

    super::run_files(settings, files, failed, opts)
}

/// Process every discovered service.
pub fn all(settings: &Settings, root: Option<&Path>, opts: &RunOptions) -> Result<()> {
    let discovery = discovery(settings, root);
    let entries = discovery.list().context("Failed to discover services")?;

    let mut files = Vec::new();
    let mut failed = Vec::new();
    for entry in entries {
        match entry.file_context() {
            Ok(file) => files.push(file),
            Err(e) => failed.push(FileReport::failed(&entry.template, &entry.template, e.to_string())),
        }
    }

    super::run_files(settings, files, failed, opts)
}

/// Print discovered services grouped by category.
pub fn list(settings: &Settings, root: Option<&Path>) -> Result<()> {
    let discovery = discovery(settings, root);
    let entries = discovery.list().context("Failed to discover services")?;

    println!("{} services under {}", "Listing".green().bold(), discovery.root().display());

    if entries.is_empty() {
        println!("  {} No services found", "!".yellow());
        return Ok(());
    }

    let mut category = None;
    for entry in &entries {
        if category != Some(&entry.category) {
            println!("\n{}:", entry.category.cyan().bold());
            category = Some(&entry.category);
        }
        println!("  {}", entry.service);
    }

    Ok(())
}
