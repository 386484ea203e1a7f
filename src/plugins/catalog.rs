//! Plugin trait and the catalog of compiled-in plugins
//!
//! A manifest on disk names an entry point; the catalog maps that name to the
//! plugin that answers `register()`.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::descriptor::PluginDescriptor;
use super::example::ExamplePlugin;

/// Trait for plugin implementations
///
/// `register` only builds and returns metadata. It must not do the hooked
/// work itself.
pub trait Plugin: Send + Sync {
    /// Build the plugin's descriptor
    fn register(&self) -> anyhow::Result<PluginDescriptor>;
}

/// Implement Plugin for closures
impl<F> Plugin for F
where
    F: Fn() -> anyhow::Result<PluginDescriptor> + Send + Sync,
{
    fn register(&self) -> anyhow::Result<PluginDescriptor> {
        (self)()
    }
}

/// Type alias for stored plugins
pub type ArcPlugin = Arc<dyn Plugin>;

/// Entry points a manifest may name
#[derive(Default, Clone)]
pub struct PluginCatalog {
    entries: BTreeMap<String, ArcPlugin>,
}

impl PluginCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the plugins that ship with the crate
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.insert(ExamplePlugin::ENTRY, ExamplePlugin);
        catalog
    }

    /// Add or replace an entry point
    pub fn insert<P: Plugin + 'static>(&mut self, entry: impl Into<String>, plugin: P) -> &mut Self {
        let entry = entry.into();
        tracing::debug!("[PluginCatalog] Adding entry point '{}'", entry);
        self.entries.insert(entry, Arc::new(plugin));
        self
    }

    /// Look up an entry point
    pub fn get(&self, entry: &str) -> Option<ArcPlugin> {
        self.entries.get(entry).cloned()
    }

    /// Entry point names, sorted
    pub fn entries(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of entry points
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entry points
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_contain_example() {
        let catalog = PluginCatalog::with_builtins();
        assert!(catalog.get("example_plugin").is_some());
        assert_eq!(catalog.entries(), vec!["example_plugin"]);
    }

    #[test]
    fn test_closure_plugin() {
        let mut catalog = PluginCatalog::new();
        catalog.insert("tiny", || -> anyhow::Result<PluginDescriptor> {
            Ok(PluginDescriptor::new("0.0.1", "Closure plugin"))
        });

        let descriptor = catalog.get("tiny").unwrap().register().unwrap();
        assert_eq!(descriptor.version, "0.0.1");
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.len(), 1);
    }
}
