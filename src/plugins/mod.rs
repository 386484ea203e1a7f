//! Plugins Module
//!
//! Discover plugins and merge their hooks into a `HookRegistry`.
//!
//! # Overview
//!
//! A plugin is a compiled-in value implementing `Plugin`. Its `register()`
//! returns a `PluginDescriptor`: version, description, author, hooks and
//! menu items. Plugins are switched on by dropping a JSON manifest naming
//! the plugin's entry point into the plugins directory.
//!
//! # Example
//!
//! ```ignore
//! use lead_hooks::plugins::{PluginCatalog, PluginConfig, PluginHost};
//!
//! let mut catalog = PluginCatalog::with_builtins();
//! catalog.insert("crm_sync", CrmSyncPlugin::new());
//!
//! let host = PluginHost::load(&PluginConfig::from_env()?, catalog)?;
//! for failure in host.failures() {
//!     eprintln!("{:?}: {}", failure.manifest_path, failure.error);
//! }
//!
//! let record = host.registry().run_after_classification(record)?;
//! ```

mod catalog;
mod descriptor;
pub mod example;
mod host;
mod loader;

pub use catalog::{ArcPlugin, Plugin, PluginCatalog};
pub use descriptor::{MenuAction, MenuItem, PluginDescriptor};
pub use example::ExamplePlugin;
pub use host::{PluginConfig, PluginHost, DEFAULT_PLUGINS_DIR};
pub use loader::{
    DiscoveryReport, LoadPolicy, LoadedPlugin, PluginLoadFailure, PluginLoader, PluginManifest,
};
