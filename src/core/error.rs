//! Crate error types

use std::path::PathBuf;

use thiserror::Error;

use crate::hooks::HookEvent;

/// Errors raised while loading plugins, running hooks or checking sources
#[derive(Error, Debug)]
pub enum LeadHooksError {
    /// Manifest file could not be read
    #[error("Failed to read plugin manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest file is not valid JSON or has the wrong shape
    #[error("Invalid plugin manifest {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest does not name a registration entry point
    #[error("Plugin '{0}' has no registration entry point")]
    MissingEntryPoint(String),

    /// Manifest names an entry point the catalog does not know
    #[error("Plugin '{plugin}' names unknown entry point '{entry}'")]
    UnknownEntryPoint { plugin: String, entry: String },

    /// The plugin's register() call failed
    #[error("Plugin '{plugin}' failed to register: {source}")]
    RegistrationFailed {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    /// register() returned a descriptor that breaks the descriptor contract
    #[error("Plugin '{plugin}' returned an invalid descriptor: {reason}")]
    InvalidDescriptor { plugin: String, reason: String },

    /// A hook callback failed under the propagate policy
    #[error("Hook {event} from plugin '{plugin}' failed: {source}")]
    HookFailed {
        plugin: String,
        event: HookEvent,
        #[source]
        source: anyhow::Error,
    },

    /// No loaded plugin offers a menu item with this label
    #[error("Menu action not found: {0}")]
    MenuActionNotFound(String),

    /// A menu action callback failed
    #[error("Menu action '{label}' failed: {source}")]
    MenuActionFailed {
        label: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Syntax tree machinery could not be set up
    #[error("Parser error: {0}")]
    Parser(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LeadHooksError {
    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        LeadHooksError::Parser(msg.into())
    }

    /// Name of the plugin this error is about, if any
    pub fn plugin(&self) -> Option<&str> {
        match self {
            LeadHooksError::MissingEntryPoint(plugin)
            | LeadHooksError::UnknownEntryPoint { plugin, .. }
            | LeadHooksError::RegistrationFailed { plugin, .. }
            | LeadHooksError::InvalidDescriptor { plugin, .. }
            | LeadHooksError::HookFailed { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

/// Result type alias for crate operations
pub type LeadHooksResult<T> = Result<T, LeadHooksError>;
