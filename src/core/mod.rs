//! Core types shared across the crate
//!
//! - `LeadHooksError` - Error type for plugin loading, hook dispatch and self-checks

pub mod error;

pub use error::{LeadHooksError, LeadHooksResult};
