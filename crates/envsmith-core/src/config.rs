//! Configuration management for envsmith.
//!
//! This module provides multi-layer configuration support with:
//! - File-based configuration (YAML)
//! - Environment variable overrides (`ENVSMITH_*`)
//! - Programmatic updates (command-line flags)
//!
//! ## Configuration Layers
//!
//! Configuration values are resolved in this priority order:
//! 1. Environment variables
//! 2. Programmatically set values
//! 3. Values loaded from file
//! 4. Default values
//!
//! ## Example
//!
//! ```no_run
//! use envsmith_core::config::{Config, Settings};
//!
//! let mut config = Config::load(Settings::default_path())?
//!     .with_env_overrides(std::env::vars())?;
//! config.set("services_root", "/opt/stack")?;
//!
//! let settings = config.settings()?;
//! assert_eq!(settings.services_root.to_str(), Some("/opt/stack"));
//! # Ok::<(), envsmith_types::EnvsmithError>(())
//! ```

use envsmith_types::{EnvsmithError, Result};
use envsmith_types::config::LogConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::fs;

/// Process environment variable that suppresses all prompts.
pub const NON_INTERACTIVE_VAR: &str = "NON_INTERACTIVE";

/// Process environment variable that marks configuration as already done.
pub const CONFIGURED_VAR: &str = "ENV_CONFIGURED";

/// Prefix for environment overrides of [`Settings`] fields.
pub const ENV_PREFIX: &str = "ENVSMITH_";

/// Configuration layer priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// Default values
    Default = 0,
    /// Values loaded from file
    Loaded = 1,
    /// Values set programmatically
    Set = 2,
    /// Values from environment variables
    Environment = 3,
}

impl ConfigLayer {
    const LOWEST_FIRST: [ConfigLayer; 4] = [
        ConfigLayer::Default,
        ConfigLayer::Loaded,
        ConfigLayer::Set,
        ConfigLayer::Environment,
    ];
}

/// Main configuration structure with multi-layer support.
///
/// This is the low-level configuration type. The typed view used by the
/// rest of the workspace is [`Settings`].
#[derive(Clone, Debug)]
pub struct Config {
    layers: HashMap<ConfigLayer, Value>,
}

impl Config {
    /// Create a configuration holding only the built-in defaults.
    pub fn new() -> Result<Self> {
        let defaults = serde_json::to_value(Settings::default())
            .map_err(|e| EnvsmithError::Config(format!("Failed to serialize defaults: {}", e)))?;

        let mut layers = HashMap::new();
        layers.insert(ConfigLayer::Default, defaults);

        Ok(Self { layers })
    }

    /// Create a new configuration from a file path.
    ///
    /// If the file doesn't exist, only the defaults are present.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::new()?;

        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| EnvsmithError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

            let value: Value = serde_yaml::from_str(&content)
                .map_err(|e| EnvsmithError::Config(format!("Failed to parse config {}: {}", path.display(), e)))?;

            // An empty YAML document parses to null
            if !value.is_null() {
                config.layers.insert(ConfigLayer::Loaded, value);
            }
            tracing::debug!("Loaded configuration from {}", path.display());
        }

        Ok(config)
    }

    /// Populate the environment layer from `ENVSMITH_*` variables.
    ///
    /// Takes the variables as an iterator so callers (and tests) decide
    /// where they come from.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut env_layer = serde_json::Map::new();

        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            let json = match field {
                "SERVICES_ROOT" | "TEMPLATE_NAME" | "BACKUP_DIR" => Value::String(value),
                "BCRYPT_COST" => {
                    let cost: u32 = value.trim().parse().map_err(|_| {
                        EnvsmithError::Config(format!("{}{} must be a number, got '{}'", ENV_PREFIX, field, value))
                    })?;
                    Value::from(cost)
                }
                _ => continue,
            };

            env_layer.insert(field.to_ascii_lowercase(), json);
        }

        if !env_layer.is_empty() {
            self.layers.insert(ConfigLayer::Environment, Value::Object(env_layer));
        }

        Ok(self)
    }

    /// Get a configuration value by key, respecting layer priority.
    ///
    /// Returns None if the key doesn't exist in any layer.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        for layer in ConfigLayer::LOWEST_FIRST.iter().rev() {
            if let Some(layer_data) = self.layers.get(layer) {
                if let Some(value) = crate::util::data::get_path(layer_data, key) {
                    if let Ok(typed_value) = serde_json::from_value(value.clone()) {
                        return Some(typed_value);
                    }
                }
            }
        }

        None
    }

    /// Set a configuration value programmatically.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| EnvsmithError::Config(format!("Failed to serialize value: {}", e)))?;

        let set_layer = self
            .layers
            .entry(ConfigLayer::Set)
            .or_insert_with(|| Value::Object(Default::default()));

        Self::set_value_at_path(set_layer, key, value)
    }

    /// Get merged data from all layers.
    pub fn merged_data(&self) -> Value {
        let mut merged = Value::Object(serde_json::Map::new());

        for layer in &ConfigLayer::LOWEST_FIRST {
            if let Some(layer_data) = self.layers.get(layer) {
                merged = crate::util::data::deep_merge(merged, layer_data.clone());
            }
        }

        merged
    }

    /// Resolve the typed settings view.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings: Settings = serde_json::from_value(self.merged_data())
            .map_err(|e| EnvsmithError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        settings.services_root = crate::util::fs::expand_path(&settings.services_root);
        settings.backup_dir = settings.backup_dir.map(crate::util::fs::expand_path);
        Ok(settings)
    }

    fn set_value_at_path(data: &mut Value, path: &str, value: Value) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = parts.split_last() else {
            return Err(EnvsmithError::Config("Empty path".to_string()));
        };

        let mut current = data;
        for part in parents {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                unreachable!("replaced with an object above");
            };
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }

        match current {
            Value::Object(map) => {
                map.insert(last.to_string(), value);
                Ok(())
            }
            _ => Err(EnvsmithError::Config(format!("Cannot set '{}': parent is not a mapping", path))),
        }
    }
}

/// Typed envsmith settings (`~/.config/envsmith/config.yml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the `<category>/<service>/` directory tree
    #[serde(default = "default_services_root")]
    pub services_root: PathBuf,

    /// File name of a service's template inside its directory
    #[serde(default = "default_template_name")]
    pub template_name: String,

    /// Directory for backups; beside the target file when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// bcrypt work factor for `GENERATE[bcrypt]`
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Historical service names mapped to current directories
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Names eligible for `{{NAME}}` substitution
    #[serde(default = "default_well_known")]
    pub well_known: Vec<String>,

    /// Names exported to the process environment after an update
    #[serde(default = "default_exports")]
    pub exports: Vec<String>,

    /// Log file outputs
    #[serde(default)]
    pub logs: Vec<LogConfig>,
}

fn default_services_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_template_name() -> String {
    ".env.example".to_string()
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_aliases() -> BTreeMap<String, String> {
    [
        ("adguardhome", "adguard"),
        ("home-assistant", "homeassistant"),
        ("pihole", "adguard"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_well_known() -> Vec<String> {
    [
        "TZ",
        "INSTALL_ROOT",
        "HOST_NAME",
        "HOST_IP",
        "LAN_SUBNET",
        "LAN_GATEWAY",
        "DOMAIN",
        "PUID",
        "PGID",
        "ACME_EMAIL",
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USER",
        "SMTP_PASSWORD",
        "SMTP_FROM",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_exports() -> Vec<String> {
    ["INSTALL_ROOT", "TZ", "ACME_EMAIL", "BASIC_AUTH", "CF_API_TOKEN", "CF_API_EMAIL"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Settings {
    /// Load settings from a file, applying `ENVSMITH_*` overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Config::load(path)?
            .with_env_overrides(std::env::vars())?
            .settings()
    }

    /// Get the default path for the settings file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("envsmith")
            .join("config.yml")
    }

    /// Check values that would make later stages fail in confusing ways.
    pub fn validate(&self) -> Result<()> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(EnvsmithError::Config(format!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }

        if self.template_name.is_empty() || self.template_name.contains('/') {
            return Err(EnvsmithError::Config(format!(
                "template_name must be a plain file name, got '{}'",
                self.template_name
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            services_root: default_services_root(),
            template_name: default_template_name(),
            backup_dir: None,
            bcrypt_cost: default_bcrypt_cost(),
            aliases: default_aliases(),
            well_known: default_well_known(),
            exports: default_exports(),
            logs: Vec::new(),
        }
    }
}

/// Pipeline control flags read from the calling process's environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    /// Suppress prompts, apply defaults, always generate optional secrets
    pub non_interactive: bool,
    /// Configuration was already completed; skip the whole pipeline
    pub already_configured: bool,
}

impl ControlFlags {
    /// Read the flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the flags through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| lookup(name).map(|v| is_truthy(&v)).unwrap_or(false);
        Self {
            non_interactive: flag(NON_INTERACTIVE_VAR),
            already_configured: flag(CONFIGURED_VAR),
        }
    }
}

/// Interpret a shell-style boolean flag value.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_layers() {
        let mut config = Config::new().unwrap();

        config.layers.insert(
            ConfigLayer::Loaded,
            serde_json::json!({"template_name": "loaded.example"}),
        );

        let value: String = config.get("template_name").unwrap();
        assert_eq!(value, "loaded.example");

        config.set("template_name", "set.example").unwrap();
        let value: String = config.get("template_name").unwrap();
        assert_eq!(value, "set.example");
    }

    #[test]
    fn test_env_layer_wins() {
        let mut config = Config::new()
            .unwrap()
            .with_env_overrides(vec![
                ("ENVSMITH_BCRYPT_COST".to_string(), "5".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ])
            .unwrap();
        config.set("bcrypt_cost", 9).unwrap();

        let settings = config.settings().unwrap();
        assert_eq!(settings.bcrypt_cost, 5);
    }

    #[test]
    fn test_env_layer_rejects_bad_cost() {
        let result = Config::new()
            .unwrap()
            .with_env_overrides(vec![("ENVSMITH_BCRYPT_COST".to_string(), "high".to_string())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_file_merges_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");
        fs::write(
            &path,
            "services_root: /srv/stack\naliases:\n  old-name: new-name\nexports: [TZ]\n",
        )
        .unwrap();

        let settings = Config::load(&path).unwrap().settings().unwrap();
        assert_eq!(settings.services_root, PathBuf::from("/srv/stack"));
        assert_eq!(settings.template_name, ".env.example");
        assert_eq!(settings.aliases.get("old-name").map(String::as_str), Some("new-name"));
        assert_eq!(settings.aliases.get("pihole").map(String::as_str), Some("adguard"));
        assert_eq!(settings.exports, vec!["TZ".to_string()]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Config::load(temp_dir.path().join("absent.yml"))
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.bcrypt_cost, 12);
        assert!(settings.well_known.contains(&"TZ".to_string()));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let mut config = Config::new().unwrap();
        config.set("bcrypt_cost", 2).unwrap();
        assert!(config.settings().is_err());
    }

    #[test]
    fn test_control_flags() {
        let flags = ControlFlags::from_lookup(|name| match name {
            NON_INTERACTIVE_VAR => Some("Yes".to_string()),
            CONFIGURED_VAR => Some("0".to_string()),
            _ => None,
        });
        assert!(flags.non_interactive);
        assert!(!flags.already_configured);

        assert!(!ControlFlags::from_lookup(|_| None).non_interactive);
    }
}
