//! Service discovery: `<root>/<category>/<service>/<template_name>`.

use crate::context::FileContext;
use envsmith_core::config::Settings;
use envsmith_types::{EnvsmithError, Result, ServiceName};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A service directory that carries a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServiceEntry {
    pub category: String,
    pub service: ServiceName,
    pub template: PathBuf,
}

impl ServiceEntry {
    /// Processing context for this service's template.
    pub fn file_context(&self) -> Result<FileContext> {
        FileContext::for_template(&self.template)
    }
}

/// Finds service templates below a root directory.
#[derive(Debug, Clone)]
pub struct ServiceDiscovery {
    root: PathBuf,
    template_name: String,
    aliases: BTreeMap<String, String>,
}

impl ServiceDiscovery {
    pub fn new(root: impl Into<PathBuf>, template_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            template_name: template_name.into(),
            aliases: Settings::default().aliases,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            root: settings.services_root.clone(),
            template_name: settings.template_name.clone(),
            aliases: settings.aliases.clone(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current directory name for a possibly historical service name.
    pub fn resolve_alias<'n>(&'n self, name: &'n str) -> &'n str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Locate a service by name or alias.
    pub fn find(&self, name: &str) -> Option<ServiceEntry> {
        let resolved = self.resolve_alias(name);
        if resolved != name {
            debug!("Service alias {} -> {}", name, resolved);
        }

        let Ok(service) = ServiceName::new(resolved) else {
            warn!("'{}' is not a valid service name", resolved);
            return None;
        };

        let (category, template) = self
            .categories()
            .into_iter()
            .map(|(category, dir)| (category, dir.join(service.as_str()).join(&self.template_name)))
            .find(|(_, template)| template.is_file())?;

        Some(ServiceEntry {
            category,
            service,
            template,
        })
    }

    /// Every service under the root that carries a template, sorted.
    pub fn list(&self) -> Result<Vec<ServiceEntry>> {
        if !self.root.is_dir() {
            return Err(EnvsmithError::Discovery(format!(
                "Services root {} is not a directory",
                self.root.display()
            )));
        }

        let mut entries = Vec::new();
        for (category, dir) in self.categories() {
            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_dir())
            {
                let Some(service) = entry.file_name().to_str().and_then(|n| ServiceName::new(n).ok()) else {
                    continue;
                };
                let template = entry.path().join(&self.template_name);
                if template.is_file() {
                    entries.push(ServiceEntry {
                        category: category.clone(),
                        service,
                        template,
                    });
                }
            }
        }

        entries.sort();
        Ok(entries)
    }

    /// Visible category directories directly under the root, by name.
    fn categories(&self) -> Vec<(String, PathBuf)> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                (!name.starts_with('.')).then(|| (name, e.into_path()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let temp = TempDir::new().unwrap();
        for (category, service) in [
            ("network", "adguard"),
            ("automation", "homeassistant"),
            ("media", "jellyfin"),
            (".git", "objects"),
        ] {
            let dir = temp.path().join(category).join(service);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(".env.example"), "# GENERATE: k\nK=\n").unwrap();
        }
        std::fs::create_dir_all(temp.path().join("media/no-template")).unwrap();
        temp
    }

    #[test]
    fn test_find_service() {
        let temp = layout();
        let discovery = ServiceDiscovery::new(temp.path(), ".env.example");

        let entry = discovery.find("jellyfin").unwrap();
        assert_eq!(entry.category, "media");
        assert_eq!(entry.template, temp.path().join("media/jellyfin/.env.example"));
        assert_eq!(entry.file_context().unwrap().target, temp.path().join("media/jellyfin/.env"));

        assert!(discovery.find("plex").is_none());
        assert!(discovery.find("no-template").is_none());
        assert!(discovery.find("../media").is_none());
    }

    #[test]
    fn test_aliases() {
        let temp = layout();
        let discovery = ServiceDiscovery::new(temp.path(), ".env.example");

        assert_eq!(discovery.find("pihole").unwrap().service.as_str(), "adguard");
        assert_eq!(discovery.find("home-assistant").unwrap().category, "automation");

        let custom = discovery.with_aliases(BTreeMap::from([("tv".to_string(), "jellyfin".to_string())]));
        assert_eq!(custom.find("tv").unwrap().service.as_str(), "jellyfin");
        assert!(custom.find("pihole").is_none());
    }

    #[test]
    fn test_list_sorted() {
        let temp = layout();
        let discovery = ServiceDiscovery::new(temp.path(), ".env.example");
        let names: Vec<_> = discovery
            .list()
            .unwrap()
            .into_iter()
            .map(|e| format!("{}/{}", e.category, e.service))
            .collect();
        assert_eq!(names, vec!["automation/homeassistant", "media/jellyfin", "network/adguard"]);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let discovery = ServiceDiscovery::new(temp.path().join("absent"), ".env.example");
        assert!(matches!(discovery.list(), Err(EnvsmithError::Discovery(_))));
        assert!(discovery.find("adguard").is_none());
    }
}
