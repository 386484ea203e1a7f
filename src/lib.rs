pub mod core;

// Lead payloads passed through hooks
pub mod leads;

// Hooks into the classification and outreach lifecycle
pub mod hooks;

// Plugin discovery and the built-in catalog
pub mod plugins;

// Static checks over the export module sources
pub mod selfcheck;

// Optional components
pub mod cli;
pub mod logging;

pub use crate::core::{LeadHooksError, LeadHooksResult};
