//! GENERATE directive handling.

use crate::prompt::Resolution;
use envsmith_secrets::SecretGenerator;
use envsmith_template::GenerateParams;
use envsmith_types::{Prompter, Result};
use tracing::{debug, warn};

/// One GENERATE directive awaiting a value.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub params: &'a GenerateParams,
    /// Value currently in the target
    pub current: &'a str,
    /// Value the template ships
    pub example: &'a str,
}

/// Produces fresh secrets for GENERATE directives.
#[derive(Debug, Clone, Copy)]
pub struct GenerateHandler {
    non_interactive: bool,
    generator: SecretGenerator,
}

impl GenerateHandler {
    pub fn new(non_interactive: bool, generator: SecretGenerator) -> Self {
        Self {
            non_interactive,
            generator,
        }
    }

    /// Generate a value. Existing values are always replaced.
    pub fn resolve(&self, prompter: &mut dyn Prompter, request: &GenerateRequest<'_>) -> Result<Resolution> {
        let params = request.params;

        if params.optional && !self.non_interactive {
            let question = format!("Generate {} ({})?", request.name, request.description);
            if !prompter.confirm(&question, true)? {
                debug!("{}: generation declined", request.name);
                return Ok(Resolution::Unchanged);
            }
        }

        if !request.current.is_empty() && request.current != request.example {
            warn!("{}: replacing an existing value with a newly generated secret", request.name);
        }

        let secret = self.generator.generate(params.kind, params.size)?;
        if let Some(plaintext) = secret.reveal.as_deref() {
            prompter.reveal(&format!("Basic-auth password for {}", request.name), plaintext)?;
        }

        Ok(Resolution::Value(secret.value))
    }
}
