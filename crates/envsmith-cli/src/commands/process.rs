//! Process explicit template files.

use crate::cli::RunOptions;
use anyhow::{bail, Result};
use envsmith_core::config::Settings;
use envsmith_env::{FileContext, FileReport};
use std::path::{Path, PathBuf};

pub fn execute(settings: &Settings, templates: &[PathBuf], target: Option<&Path>, opts: &RunOptions) -> Result<()> {
    if target.is_some() && templates.len() > 1 {
        bail!("--target can only be used with a single template");
    }

    let mut files = Vec::new();
    let mut failed = Vec::new();

    for template in templates {
        match target {
            Some(target) => files.push(FileContext::new(template, target)),
            None => match FileContext::for_template(template) {
                Ok(file) => files.push(file),
                Err(e) => failed.push(FileReport::failed(template, template, e.to_string())),
            },
        }
    }

    super::run_files(settings, files, failed, opts)
}
