//! Plugin descriptor returned by a plugin's registration entry point

use std::collections::HashSet;
use std::sync::Arc;

use crate::hooks::{Hook, HookEvent};

/// Callback behind a menu item
pub type MenuAction = Arc<dyn Fn() -> anyhow::Result<String> + Send + Sync>;

/// A custom action a plugin adds to the host's menu
#[derive(Clone)]
pub struct MenuItem {
    /// Label shown to the user
    pub label: String,
    /// Optional icon shown beside the label
    pub icon: Option<String>,
    /// Callback run when the item is picked; returns a status message
    pub action: MenuAction,
}

impl MenuItem {
    /// Create a menu item
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            icon: None,
            action: Arc::new(action),
        }
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Run the action
    pub fn run(&self) -> anyhow::Result<String> {
        (self.action)()
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .finish()
    }
}

/// Metadata and callbacks a plugin hands to the host
///
/// Built fresh on every `register()` call. The host owns it after the hooks
/// have been merged.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// Plugin version, e.g. "1.0.0"
    pub version: String,
    /// One-line description
    pub description: String,
    /// Author, if the plugin names one
    pub author: Option<String>,
    /// Hooks, at most one per event
    pub hooks: Vec<Hook>,
    /// Custom menu items
    pub menu_items: Vec<MenuItem>,
}

impl PluginDescriptor {
    /// Create a descriptor with no hooks or menu items
    pub fn new(version: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            description: description.into(),
            author: None,
            hooks: Vec::new(),
            menu_items: Vec::new(),
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add a hook
    pub fn with_hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Add a menu item
    pub fn with_menu_item(mut self, item: MenuItem) -> Self {
        self.menu_items.push(item);
        self
    }

    /// Events this plugin hooks into, in declaration order
    pub fn events(&self) -> Vec<HookEvent> {
        self.hooks.iter().map(Hook::event).collect()
    }

    /// Drop hooks for the given events
    pub fn without_events(mut self, disabled: &[HookEvent]) -> Self {
        self.hooks.retain(|hook| !disabled.contains(&hook.event()));
        self
    }

    /// Check the descriptor contract
    ///
    /// Returns the reason the descriptor is unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.version.trim().is_empty() {
            return Err("version is empty".to_string());
        }

        let mut seen = HashSet::new();
        for event in self.events() {
            if !seen.insert(event) {
                return Err(format!("more than one hook for {}", event));
            }
        }

        if self.menu_items.iter().any(|item| item.label.trim().is_empty()) {
            return Err("menu item with an empty label".to_string());
        }

        Ok(())
    }
}
