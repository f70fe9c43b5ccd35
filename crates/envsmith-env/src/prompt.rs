//! PROMPT directive handling.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};
use envsmith_template::PromptParams;
use envsmith_types::{EnvsmithError, PromptType, Prompter, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

/// Whether `value` has the shape of an email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// One PROMPT directive awaiting a value.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub params: &'a PromptParams,
    /// Current value in the target, falling back to the template example
    pub current: &'a str,
}

impl PromptRequest<'_> {
    fn label(&self) -> String {
        if self.description.is_empty() {
            self.name.to_string()
        } else {
            format!("{} ({})", self.description, self.name)
        }
    }
}

/// What the handler decided for a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Store this value
    Value(String),
    /// Leave the variable as it is
    Unchanged,
}

/// Resolves PROMPT directives interactively or from defaults.
#[derive(Debug, Clone, Copy)]
pub struct PromptHandler {
    non_interactive: bool,
}

impl PromptHandler {
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }

    pub fn resolve(&self, prompter: &mut dyn Prompter, request: &PromptRequest<'_>) -> Result<Resolution> {
        if self.non_interactive {
            return Self::resolve_unattended(request);
        }

        match request.params.kind {
            PromptType::Plain => Self::ask_plain(prompter, request),
            PromptType::Email => Self::ask_email(prompter, request),
            PromptType::Password => Self::ask_password(prompter, request),
        }
    }

    fn resolve_unattended(request: &PromptRequest<'_>) -> Result<Resolution> {
        if request.params.optional {
            debug!("{}: optional, left unchanged", request.name);
            return Ok(Resolution::Unchanged);
        }

        let current = request.current;
        match request.params.kind {
            PromptType::Plain if !current.is_empty() => Ok(Resolution::Value(current.to_string())),
            PromptType::Email if is_valid_email(current) => Ok(Resolution::Value(current.to_string())),
            PromptType::Password => Err(EnvsmithError::RequiredInput(format!(
                "{} needs a password and the run is non-interactive",
                request.name
            ))),
            _ => Err(EnvsmithError::RequiredInput(format!(
                "{} has no usable default and the run is non-interactive",
                request.name
            ))),
        }
    }

    fn ask_plain(prompter: &mut dyn Prompter, request: &PromptRequest<'_>) -> Result<Resolution> {
        let label = request.label();
        loop {
            let input = prompter.text(&label, request.current)?;
            if !input.is_empty() {
                return Ok(Resolution::Value(input));
            }
            if request.params.optional {
                return Ok(Resolution::Unchanged);
            }
            if !request.current.is_empty() {
                return Ok(Resolution::Value(request.current.to_string()));
            }
            prompter.notify(&format!("{} is required", request.name));
        }
    }

    fn ask_email(prompter: &mut dyn Prompter, request: &PromptRequest<'_>) -> Result<Resolution> {
        let label = request.label();
        loop {
            let input = prompter.text(&label, request.current)?;
            let input = input.trim();
            if input.is_empty() {
                if request.params.optional {
                    return Ok(Resolution::Unchanged);
                }
                prompter.notify(&format!("{} is required", request.name));
                continue;
            }
            if is_valid_email(input) {
                return Ok(Resolution::Value(input.to_string()));
            }
            prompter.notify(&format!("'{}' is not a valid email address", input));
        }
    }

    fn ask_password(prompter: &mut dyn Prompter, request: &PromptRequest<'_>) -> Result<Resolution> {
        let label = request.label();
        loop {
            let input = prompter.secret(&label)?;
            if !input.is_empty() {
                return Ok(Resolution::Value(input));
            }
            if request.params.optional {
                return Ok(Resolution::Unchanged);
            }
            prompter.notify(&format!("{} is required", request.name));
        }
    }
}

/// Terminal prompter backed by dialoguer.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
    term: Term,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            term: Term::stderr(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_error(e: dialoguer::Error) -> EnvsmithError {
    EnvsmithError::Prompt(e.to_string())
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(prompt_error)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    fn notify(&mut self, message: &str) {
        if let Err(e) = self.term.write_line(&style(message).yellow().to_string()) {
            debug!("Could not show notice: {}", e);
        }
    }

    fn reveal(&mut self, label: &str, secret: &str) -> Result<()> {
        self.term.write_line(&format!(
            "{} {}: {}",
            style("One-time secret").bold().red(),
            label,
            style(secret).bold()
        ))?;
        self.term
            .write_line(&style("Store it now; it is not saved anywhere.").dim().to_string())?;
        self.term.flush()?;
        Ok(())
    }
}
