//! Hooks Module
//!
//! Let plugins step into the lead pipeline at fixed lifecycle points.
//!
//! # Overview
//!
//! Hooks let you:
//! - Enrich or normalize lead data before classification
//! - Tag or rescore a lead record after classification
//! - Add context for the outreach writer
//! - Log outreach results to analytics or a CRM
//!
//! # Example
//!
//! ```ignore
//! use lead_hooks::hooks::{Hook, HookRegistry};
//!
//! let mut hooks = HookRegistry::new();
//!
//! hooks.register(
//!     "restaurants",
//!     Hook::before_outreach(|mut lead, _message_type| {
//!         if lead.business_type.as_deref() == Some("restaurant") {
//!             lead.custom_note = Some("Mention online reservations".into());
//!         }
//!         Ok(lead)
//!     }),
//! );
//!
//! let lead = hooks.run_before_outreach(lead, MessageType::Email)?;
//! ```
//!
//! # Hook Events
//!
//! | Event | Signature | Chained |
//! |-------|-----------|---------|
//! | `before_classification` | `(LeadData) -> LeadData` | yes |
//! | `after_classification` | `(LeadRecord) -> LeadRecord` | yes |
//! | `before_outreach` | `(LeadData, MessageType) -> LeadData` | yes |
//! | `after_outreach` | `(&OutreachResult, &LeadData)` | no |
//!
//! Chained hooks run in registration order, each receiving the previous
//! hook's output. A failing hook is logged and skipped under
//! `HookFailurePolicy::Isolate`, or aborts the run under `Propagate`.

mod registry;
mod types;

pub use registry::HookRegistry;
pub use types::{
    AfterClassificationFn, AfterOutreachFn, BeforeClassificationFn, BeforeOutreachFn, Hook,
    HookEvent, HookFailurePolicy,
};
