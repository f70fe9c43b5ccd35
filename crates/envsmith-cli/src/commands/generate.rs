//! Generate a single secret.

use anyhow::{Context, Result};
use envsmith_core::config::Settings;
use envsmith_core::term::warning;
use envsmith_secrets::SecretGenerator;
use envsmith_template::GenerateParams;
use envsmith_types::GenerateType;

/// Print the stored value on stdout; a bcrypt plaintext goes to stderr.
pub fn execute(settings: &Settings, kind: &str, size: usize) -> Result<()> {
    let kind: GenerateType = kind.parse().context("Invalid generation type")?;
    let params = GenerateParams::new(kind, size);
    for message in &params.warnings {
        eprintln!("{}", warning(message));
    }

    let secret = SecretGenerator::with_bcrypt_cost(settings.bcrypt_cost).generate(params.kind, params.size)?;
    println!("{}", secret.value);

    if let Some(plaintext) = secret.reveal {
        eprintln!("password: {}", plaintext);
    }

    Ok(())
}
