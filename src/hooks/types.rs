//! Hook Types
//!
//! Core types for the hooks system:
//! - `HookEvent` - The lifecycle point a hook runs at
//! - `Hook` - A callback tagged with its event and typed for it
//! - `HookFailurePolicy` - What the registry does when a callback fails

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::leads::{LeadData, LeadRecord, MessageType, OutreachResult};

/// Hook event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookEvent {
    /// Before a lead is classified - can rewrite the lead data
    BeforeClassification,
    /// After a lead is classified - can rewrite the lead record
    AfterClassification,
    /// Before outreach is generated - can rewrite the lead data
    BeforeOutreach,
    /// After outreach is generated - observe only
    AfterOutreach,
}

impl HookEvent {
    /// All events, in pipeline order
    pub const ALL: [HookEvent; 4] = [
        HookEvent::BeforeClassification,
        HookEvent::AfterClassification,
        HookEvent::BeforeOutreach,
        HookEvent::AfterOutreach,
    ];

    /// Name used in manifests and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::BeforeClassification => "before_classification",
            HookEvent::AfterClassification => "after_classification",
            HookEvent::BeforeOutreach => "before_outreach",
            HookEvent::AfterOutreach => "after_outreach",
        }
    }

    /// Whether callbacks for this event hand a payload to the next one
    pub fn is_chained(&self) -> bool {
        !matches!(self, HookEvent::AfterOutreach)
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown hook event: {}", s))
    }
}

/// `before_classification(lead_data) -> lead_data`
pub type BeforeClassificationFn = Arc<dyn Fn(LeadData) -> anyhow::Result<LeadData> + Send + Sync>;

/// `after_classification(lead_record) -> lead_record`
pub type AfterClassificationFn = Arc<dyn Fn(LeadRecord) -> anyhow::Result<LeadRecord> + Send + Sync>;

/// `before_outreach(lead_data, message_type) -> lead_data`
pub type BeforeOutreachFn =
    Arc<dyn Fn(LeadData, MessageType) -> anyhow::Result<LeadData> + Send + Sync>;

/// `after_outreach(result, lead_data)`
pub type AfterOutreachFn =
    Arc<dyn Fn(&OutreachResult, &LeadData) -> anyhow::Result<()> + Send + Sync>;

/// A hook callback, tagged by the event it handles
///
/// The variant fixes the call signature, so a callback can only ever be
/// registered under the event it was written for.
#[derive(Clone)]
pub enum Hook {
    BeforeClassification(BeforeClassificationFn),
    AfterClassification(AfterClassificationFn),
    BeforeOutreach(BeforeOutreachFn),
    AfterOutreach(AfterOutreachFn),
}

impl Hook {
    /// Wrap a `before_classification` callback
    pub fn before_classification<F>(f: F) -> Self
    where
        F: Fn(LeadData) -> anyhow::Result<LeadData> + Send + Sync + 'static,
    {
        Hook::BeforeClassification(Arc::new(f))
    }

    /// Wrap an `after_classification` callback
    pub fn after_classification<F>(f: F) -> Self
    where
        F: Fn(LeadRecord) -> anyhow::Result<LeadRecord> + Send + Sync + 'static,
    {
        Hook::AfterClassification(Arc::new(f))
    }

    /// Wrap a `before_outreach` callback
    pub fn before_outreach<F>(f: F) -> Self
    where
        F: Fn(LeadData, MessageType) -> anyhow::Result<LeadData> + Send + Sync + 'static,
    {
        Hook::BeforeOutreach(Arc::new(f))
    }

    /// Wrap an `after_outreach` callback
    pub fn after_outreach<F>(f: F) -> Self
    where
        F: Fn(&OutreachResult, &LeadData) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Hook::AfterOutreach(Arc::new(f))
    }

    /// The event this hook runs at
    pub fn event(&self) -> HookEvent {
        match self {
            Hook::BeforeClassification(_) => HookEvent::BeforeClassification,
            Hook::AfterClassification(_) => HookEvent::AfterClassification,
            Hook::BeforeOutreach(_) => HookEvent::BeforeOutreach,
            Hook::AfterOutreach(_) => HookEvent::AfterOutreach,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.event()).finish()
    }
}

/// What the registry does when a callback returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookFailurePolicy {
    /// Log the failure and continue with the payload as it was before the
    /// failing callback
    #[default]
    Isolate,
    /// Stop at the first failure and return it to the caller
    Propagate,
}

impl FromStr for HookFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolate" => Ok(HookFailurePolicy::Isolate),
            "propagate" => Ok(HookFailurePolicy::Propagate),
            other => Err(format!("unknown hook failure policy: {}", other)),
        }
    }
}
