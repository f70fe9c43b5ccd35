//! Run-wide and per-file processing context.

use envsmith_core::config::{ControlFlags, Settings};
use envsmith_secrets::SecretGenerator;
use envsmith_template::WellKnown;
use envsmith_types::{bail, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Template suffixes stripped to derive a target file name.
pub const TEMPLATE_SUFFIXES: [&str; 3] = [".example", ".template", ".tmpl"];

/// State shared by every file in one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Never ask the operator anything
    pub non_interactive: bool,
    /// Values available to `{{NAME}}` placeholders
    pub well_known: WellKnown,
    /// Names that are exported after a successful update
    pub export_allow_list: Vec<String>,
    /// Also call `std::env::set_var` for exported names
    pub export_to_process: bool,
    /// Where backups go; `None` puts them beside the target
    pub backup_dir: Option<PathBuf>,
    /// Secret generator carrying the bcrypt cost
    pub generator: SecretGenerator,
    well_known_names: Vec<String>,
    exported: IndexMap<String, String>,
}

impl RunContext {
    /// Context with default settings and no well-known values.
    pub fn new(non_interactive: bool) -> Self {
        let settings = Settings::default();
        Self {
            non_interactive,
            well_known: WellKnown::new(),
            export_allow_list: settings.exports,
            export_to_process: false,
            backup_dir: None,
            generator: SecretGenerator::with_bcrypt_cost(settings.bcrypt_cost),
            well_known_names: settings.well_known,
            exported: IndexMap::new(),
        }
    }

    /// Context for a real run: well-known values come from the process
    /// environment and exports reach it too.
    pub fn from_settings(settings: &Settings, flags: &ControlFlags) -> Self {
        Self {
            non_interactive: flags.non_interactive,
            well_known: WellKnown::from_env(&settings.well_known),
            export_allow_list: settings.exports.clone(),
            export_to_process: true,
            backup_dir: settings.backup_dir.clone(),
            generator: SecretGenerator::with_bcrypt_cost(settings.bcrypt_cost),
            well_known_names: settings.well_known.clone(),
            exported: IndexMap::new(),
        }
    }

    pub fn with_well_known(mut self, well_known: WellKnown) -> Self {
        self.well_known = well_known;
        self
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.generator = SecretGenerator::with_bcrypt_cost(cost);
        self
    }

    /// Whether `name` is on the export allow-list.
    pub fn should_export(&self, name: &str) -> bool {
        self.export_allow_list.iter().any(|n| n == name)
    }

    /// Export an allow-listed value. Well-known names also become available
    /// to placeholder substitution in later files.
    pub fn export(&mut self, name: &str, value: &str) {
        if !self.should_export(name) {
            return;
        }

        debug!("Exporting {}", name);
        if self.export_to_process {
            std::env::set_var(name, value);
        }
        if self.well_known_names.iter().any(|n| n == name) && !value.is_empty() {
            self.well_known.insert(name, value);
        }
        self.exported.insert(name.to_string(), value.to_string());
    }

    /// Values exported so far, in export order.
    pub fn exported(&self) -> impl Iterator<Item = (&str, &str)> {
        self.exported.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Exported values as a shell script for a calling shell to `source`.
    pub fn export_script(&self) -> String {
        self.exported()
            .map(|(name, value)| format!("export {}={}\n", name, shell_quote(value)))
            .collect()
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// The template and target of the file currently being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    pub template: PathBuf,
    pub target: PathBuf,
}

impl FileContext {
    pub fn new(template: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
        }
    }

    /// Context whose target is derived from the template name.
    pub fn for_template(template: impl Into<PathBuf>) -> Result<Self> {
        let template = template.into();
        let Some(target) = derive_target(&template) else {
            bail!(
                Template,
                "Cannot derive a target for {}: name must end in {}; pass an explicit target",
                template.display(),
                TEMPLATE_SUFFIXES.join(", ")
            );
        };
        Ok(Self { template, target })
    }
}

/// `X.example` → `X` in the same directory.
pub fn derive_target(template: &Path) -> Option<PathBuf> {
    let file_name = template.file_name()?.to_str()?;
    TEMPLATE_SUFFIXES.iter().find_map(|suffix| {
        file_name
            .strip_suffix(suffix)
            .filter(|stem| !stem.is_empty())
            .map(|stem| template.with_file_name(stem))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_target() {
        assert_eq!(
            derive_target(Path::new("/srv/app/.env.example")),
            Some(PathBuf::from("/srv/app/.env"))
        );
        assert_eq!(derive_target(Path::new("config.tmpl")), Some(PathBuf::from("config")));
        assert_eq!(derive_target(Path::new("app.env.template")), Some(PathBuf::from("app.env")));
        assert_eq!(derive_target(Path::new(".example")), None);
        assert_eq!(derive_target(Path::new("/srv/app/.env")), None);
    }

    #[test]
    fn test_for_template_requires_suffix() {
        assert!(FileContext::for_template("/tmp/plain.txt").is_err());
        let ctx = FileContext::for_template("/tmp/.env.example").unwrap();
        assert_eq!(ctx.target, PathBuf::from("/tmp/.env"));
    }

    #[test]
    fn test_export_allow_list() {
        let mut ctx = RunContext::new(true);
        ctx.export("TZ", "Europe/Oslo");
        ctx.export("DB_PASSWORD", "secret");

        let exported: Vec<_> = ctx.exported().collect();
        assert_eq!(exported, vec![("TZ", "Europe/Oslo")]);
        assert_eq!(ctx.well_known.get("TZ"), Some("Europe/Oslo"));
    }

    #[test]
    fn test_export_script_quotes_values() {
        let mut ctx = RunContext::new(true);
        ctx.export("BASIC_AUTH", "admin:$$2b$$it's");
        assert_eq!(ctx.export_script(), "export BASIC_AUTH='admin:$$2b$$it'\\''s'\n");
    }
}
