//! Lead payloads passed through the hook pipeline

mod types;

pub use types::{Extras, LeadData, LeadRecord, MessageType, OutreachResult, OutreachVariant};
