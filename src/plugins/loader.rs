//! Plugin discovery
//!
//! Every `*.json` file in the plugins directory is a manifest naming a
//! compiled-in entry point:
//!
//! ```json
//! {
//!   "entry": "example_plugin",
//!   "name": "example",
//!   "enabled": true,
//!   "disabled_hooks": ["after_outreach"]
//! }
//! ```
//!
//! Manifests are loaded in file name order. That order is also the order
//! their hooks run in.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{LeadHooksError, LeadHooksResult};
use crate::hooks::HookEvent;

use super::catalog::PluginCatalog;
use super::descriptor::PluginDescriptor;

/// Manifest file extension
const MANIFEST_EXTENSION: &str = "json";

/// On-disk plugin manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Catalog key of the plugin's registration entry point
    #[serde(default)]
    pub entry: Option<String>,

    /// Plugin name; the manifest file stem when absent
    #[serde(default)]
    pub name: Option<String>,

    /// Whether the plugin is loaded at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Events whose hooks are dropped before merge
    #[serde(default)]
    pub disabled_hooks: Vec<HookEvent>,
}

fn default_enabled() -> bool {
    true
}

impl PluginManifest {
    /// Create a manifest for an entry point
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: Some(entry.into()),
            name: None,
            enabled: true,
            disabled_hooks: Vec::new(),
        }
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> LeadHooksResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| LeadHooksError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| LeadHooksError::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What discovery does when a plugin fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log the failure, record it in the report and keep going
    #[default]
    Skip,
    /// Stop at the first failure and return it
    Strict,
}

/// A plugin that registered successfully
#[derive(Debug, Clone)]
pub struct LoadedPlugin {
    /// Plugin name
    pub name: String,
    /// Manifest the plugin was loaded from
    pub manifest_path: PathBuf,
    /// What the plugin's register() returned, minus disabled hooks
    pub descriptor: PluginDescriptor,
}

/// A plugin that was rejected
#[derive(Debug)]
pub struct PluginLoadFailure {
    /// Manifest that failed
    pub manifest_path: PathBuf,
    /// Why it failed
    pub error: LeadHooksError,
}

/// Outcome of scanning a plugins directory
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Plugins loaded, in load order
    pub loaded: Vec<LoadedPlugin>,
    /// Plugins rejected, in scan order
    pub failures: Vec<PluginLoadFailure>,
    /// Manifests skipped because they are disabled
    pub disabled: Vec<PathBuf>,
}

/// Discovers plugin manifests and registers their plugins
#[derive(Debug, Clone)]
pub struct PluginLoader {
    catalog: PluginCatalog,
    policy: LoadPolicy,
}

impl PluginLoader {
    /// Create a loader over a catalog
    pub fn new(catalog: PluginCatalog) -> Self {
        Self {
            catalog,
            policy: LoadPolicy::default(),
        }
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Manifest files in a directory, sorted by file name
    pub fn manifest_paths(dir: &Path) -> LeadHooksResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            MANIFEST_EXTENSION
        );

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| LeadHooksError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("[PluginLoader] Skipping unreadable path: {}", e);
                    None
                }
            })
            .collect();

        paths.sort();
        Ok(paths)
    }

    /// Load every plugin in a directory
    ///
    /// A missing directory yields an empty report. Under `LoadPolicy::Strict`
    /// the first failure is returned as the error.
    pub fn discover(&self, dir: &Path) -> LeadHooksResult<DiscoveryReport> {
        let mut report = DiscoveryReport::default();

        if !dir.is_dir() {
            tracing::debug!("[PluginLoader] Plugins directory {:?} not found", dir);
            return Ok(report);
        }

        for path in Self::manifest_paths(dir)? {
            match self.load_manifest(&path) {
                Ok(Some(plugin)) => {
                    tracing::info!("[PluginLoader] Plugin loaded: {}", plugin.name);
                    report.loaded.push(plugin);
                }
                Ok(None) => {
                    tracing::info!("[PluginLoader] Plugin disabled: {:?}", path);
                    report.disabled.push(path);
                }
                Err(error) => {
                    if self.policy == LoadPolicy::Strict {
                        return Err(error);
                    }
                    tracing::warn!("[PluginLoader] Error loading plugin {:?}: {}", path, error);
                    report.failures.push(PluginLoadFailure {
                        manifest_path: path,
                        error,
                    });
                }
            }
        }

        tracing::info!("[PluginLoader] Loaded {} plugins", report.loaded.len());
        Ok(report)
    }

    /// Load one manifest and register its plugin
    ///
    /// Returns `Ok(None)` for a disabled manifest.
    pub fn load_manifest(&self, path: &Path) -> LeadHooksResult<Option<LoadedPlugin>> {
        let manifest = PluginManifest::load(path)?;
        let name = manifest
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_default();

        if !manifest.enabled {
            return Ok(None);
        }

        let descriptor = self.register(&name, &manifest)?;

        Ok(Some(LoadedPlugin {
            name,
            manifest_path: path.to_path_buf(),
            descriptor,
        }))
    }

    /// Resolve a manifest's entry point and call its register()
    pub fn register(&self, name: &str, manifest: &PluginManifest) -> LeadHooksResult<PluginDescriptor> {
        let entry = manifest
            .entry
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| LeadHooksError::MissingEntryPoint(name.to_string()))?;

        let plugin = self
            .catalog
            .get(entry)
            .ok_or_else(|| LeadHooksError::UnknownEntryPoint {
                plugin: name.to_string(),
                entry: entry.to_string(),
            })?;

        tracing::info!("[PluginLoader] Loading plugin: {}", name);

        let descriptor = plugin
            .register()
            .map_err(|source| LeadHooksError::RegistrationFailed {
                plugin: name.to_string(),
                source,
            })?;

        descriptor
            .validate()
            .map_err(|reason| LeadHooksError::InvalidDescriptor {
                plugin: name.to_string(),
                reason,
            })?;

        Ok(descriptor.without_events(&manifest.disabled_hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Hook;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    fn loader() -> PluginLoader {
        let mut catalog = PluginCatalog::with_builtins();
        catalog.insert("failing", || -> anyhow::Result<PluginDescriptor> {
            anyhow::bail!("database offline")
        });
        catalog.insert("twice", || -> anyhow::Result<PluginDescriptor> {
            Ok(PluginDescriptor::new("1.0.0", "Duplicate hooks")
                .with_hook(Hook::before_classification(|l| Ok(l)))
                .with_hook(Hook::before_classification(|l| Ok(l))))
        });
        PluginLoader::new(catalog)
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let report = loader().discover(&temp.path().join("nope")).unwrap();
        assert!(report.loaded.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_name_defaults_to_file_stem() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "tagging.json", r#"{ "entry": "example_plugin" }"#);
        write(temp.path(), "notes.txt", "not a manifest");

        let report = loader().discover(temp.path()).unwrap();
        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.loaded[0].name, "tagging");
        assert_eq!(report.loaded[0].descriptor.version, "1.0.0");
    }

    #[test]
    fn test_blank_name_falls_back_to_file_stem() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "tagging.json", r#"{ "entry": "example_plugin", "name": "  " }"#);

        let report = loader().discover(temp.path()).unwrap();
        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.loaded[0].name, "tagging");
    }

    #[test]
    fn test_valid_and_missing_entry_skip() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a_valid.json", r#"{ "entry": "example_plugin", "name": "example" }"#);
        write(temp.path(), "b_broken.json", r#"{ "name": "broken" }"#);

        let report = loader().discover(temp.path()).unwrap();

        assert_eq!(report.loaded.len(), 1);
        assert_eq!(report.loaded[0].name, "example");
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0].error,
            LeadHooksError::MissingEntryPoint(name) if name == "broken"
        ));
    }

    #[test]
    fn test_valid_and_missing_entry_strict() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a_valid.json", r#"{ "entry": "example_plugin" }"#);
        write(temp.path(), "b_broken.json", r#"{ "enabled": true }"#);

        let err = loader()
            .with_policy(LoadPolicy::Strict)
            .discover(temp.path())
            .unwrap_err();
        assert!(matches!(err, LeadHooksError::MissingEntryPoint(name) if name == "b_broken"));
    }

    #[test]
    fn test_failure_kinds() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bad_json.json", "{ entry: ");
        write(temp.path(), "failing.json", r#"{ "entry": "failing" }"#);
        write(temp.path(), "twice.json", r#"{ "entry": "twice" }"#);
        write(temp.path(), "unknown.json", r#"{ "entry": "crm_sync" }"#);

        let report = loader().discover(temp.path()).unwrap();
        assert!(report.loaded.is_empty());

        let errors: Vec<&LeadHooksError> = report.failures.iter().map(|f| &f.error).collect();
        assert!(matches!(errors[0], LeadHooksError::InvalidManifest { .. }));
        assert!(matches!(errors[1], LeadHooksError::RegistrationFailed { .. }));
        assert!(matches!(errors[2], LeadHooksError::InvalidDescriptor { .. }));
        assert!(matches!(errors[3], LeadHooksError::UnknownEntryPoint { entry, .. } if entry == "crm_sync"));
    }

    #[test]
    fn test_disabled_manifest_and_hooks() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "off.json", r#"{ "entry": "example_plugin", "enabled": false }"#);
        write(
            temp.path(),
            "quiet.json",
            r#"{ "entry": "example_plugin", "disabled_hooks": ["after_outreach", "before_classification"] }"#,
        );

        let report = loader().discover(temp.path()).unwrap();
        assert_eq!(report.disabled.len(), 1);
        assert_eq!(report.loaded.len(), 1);
        assert_eq!(
            report.loaded[0].descriptor.events(),
            vec![HookEvent::AfterClassification, HookEvent::BeforeOutreach]
        );
    }

    #[test]
    fn test_unknown_hook_name_rejected() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "typo.json", r#"{ "entry": "example_plugin", "disabled_hooks": ["on_export"] }"#);

        let report = loader().discover(temp.path()).unwrap();
        assert!(matches!(report.failures[0].error, LeadHooksError::InvalidManifest { .. }));
    }

    #[test]
    fn test_manifest_paths_sorted() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "zeta.json", "{}");
        write(temp.path(), "alpha.json", "{}");
        fs::create_dir(temp.path().join("dir.json")).unwrap();

        let paths = PluginLoader::manifest_paths(temp.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.json", "zeta.json"]);
    }
}
