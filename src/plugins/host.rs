//! Plugin host
//!
//! Owns everything discovery produced: the merged hook registry, the loaded
//! plugins and the failures. Populated once at startup, read-only afterwards.

use std::env;
use std::path::PathBuf;

use crate::core::{LeadHooksError, LeadHooksResult};
use crate::hooks::{HookFailurePolicy, HookRegistry};

use super::catalog::PluginCatalog;
use super::descriptor::MenuItem;
use super::loader::{LoadPolicy, LoadedPlugin, PluginLoader, PluginLoadFailure};

/// Default directory scanned for plugin manifests
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// Configuration for plugin discovery and hook dispatch
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Directory scanned for `*.json` manifests
    pub plugins_dir: PathBuf,
    /// What to do when a plugin fails to load
    pub load_policy: LoadPolicy,
    /// What to do when a hook fails at run time
    pub hook_failure_policy: HookFailurePolicy,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from(DEFAULT_PLUGINS_DIR),
            load_policy: LoadPolicy::default(),
            hook_failure_policy: HookFailurePolicy::default(),
        }
    }
}

impl PluginConfig {
    /// Create a config scanning the given directory
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            ..Default::default()
        }
    }

    /// Build a config from the environment
    ///
    /// - `LEAD_HOOKS_PLUGINS_DIR` - manifest directory (default `plugins`)
    /// - `LEAD_HOOKS_STRICT_PLUGINS` - `1`/`true` aborts on the first bad plugin
    /// - `LEAD_HOOKS_HOOK_FAILURES` - `isolate` (default) or `propagate`
    pub fn from_env() -> LeadHooksResult<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("LEAD_HOOKS_PLUGINS_DIR") {
            config.plugins_dir = PathBuf::from(dir);
        }

        if let Ok(strict) = env::var("LEAD_HOOKS_STRICT_PLUGINS") {
            if matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.load_policy = LoadPolicy::Strict;
            }
        }

        if let Ok(policy) = env::var("LEAD_HOOKS_HOOK_FAILURES") {
            config.hook_failure_policy = policy.parse().map_err(LeadHooksError::InvalidConfig)?;
        }

        Ok(config)
    }

    /// Set the load policy
    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    /// Set the hook failure policy
    pub fn with_hook_failure_policy(mut self, policy: HookFailurePolicy) -> Self {
        self.hook_failure_policy = policy;
        self
    }
}

/// Loaded plugins and their merged hooks
#[derive(Debug, Default)]
pub struct PluginHost {
    registry: HookRegistry,
    plugins: Vec<LoadedPlugin>,
    failures: Vec<PluginLoadFailure>,
    disabled: Vec<PathBuf>,
}

impl PluginHost {
    /// Discover plugins and merge their hooks
    pub fn load(config: &PluginConfig, catalog: PluginCatalog) -> LeadHooksResult<Self> {
        let report = PluginLoader::new(catalog)
            .with_policy(config.load_policy)
            .discover(&config.plugins_dir)?;

        let mut registry = HookRegistry::new().with_failure_policy(config.hook_failure_policy);
        for plugin in &report.loaded {
            registry.merge(&plugin.name, &plugin.descriptor);
        }

        tracing::debug!("[PluginHost] Hooks after merge: {:?}", registry);

        Ok(Self {
            registry,
            plugins: report.loaded,
            failures: report.failures,
            disabled: report.disabled,
        })
    }

    /// The merged hook registry
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Loaded plugins, in load order
    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    /// Find a loaded plugin by name
    pub fn plugin(&self, name: &str) -> Option<&LoadedPlugin> {
        self.plugins.iter().find(|p| p.name == name)
    }

    /// Plugins that failed to load
    pub fn failures(&self) -> &[PluginLoadFailure] {
        &self.failures
    }

    /// Manifests skipped because they are disabled
    pub fn disabled(&self) -> &[PathBuf] {
        &self.disabled
    }

    /// Menu items from all plugins, with the owning plugin's name
    pub fn menu_items(&self) -> impl Iterator<Item = (&str, &MenuItem)> {
        self.plugins.iter().flat_map(|plugin| {
            plugin
                .descriptor
                .menu_items
                .iter()
                .map(move |item| (plugin.name.as_str(), item))
        })
    }

    /// Run the first menu item with this label
    pub fn run_menu_action(&self, label: &str) -> LeadHooksResult<String> {
        let (plugin, item) = self
            .menu_items()
            .find(|(_, item)| item.label == label)
            .ok_or_else(|| LeadHooksError::MenuActionNotFound(label.to_string()))?;

        tracing::debug!("[PluginHost] Running menu action '{}' from plugin '{}'", label, plugin);

        item.run().map_err(|source| LeadHooksError::MenuActionFailed {
            label: label.to_string(),
            source,
        })
    }
}
