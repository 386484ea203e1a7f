//! Lead payload types
//!
//! Payloads handed to hooks at each lifecycle stage:
//! - `LeadData` - Lead before classification and before outreach
//! - `LeadRecord` - Classified lead with scores and tags
//! - `OutreachResult` - Generated outreach variants for one lead

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plugin-specific fields carried alongside the typed ones
pub type Extras = BTreeMap<String, Value>;

/// Lead data as seen before classification and before outreach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default)]
    pub emails: Vec<String>,

    #[serde(default)]
    pub phones: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Business type from classification, e.g. "restaurant"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,

    /// Fit score (0-10) once the lead has been classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_fit: Option<f64>,

    /// Page content sample handed to the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sample: Option<String>,

    /// Advisory note for the outreach writer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_note: Option<String>,

    /// Fields not covered above
    #[serde(flatten)]
    pub extra: Extras,
}

impl LeadData {
    /// Create lead data with a display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the business type
    pub fn with_business_type(mut self, business_type: impl Into<String>) -> Self {
        self.business_type = Some(business_type.into());
        self
    }

    /// Set the domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Name to show in logs
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.domain.as_deref())
            .unwrap_or("Unknown")
    }
}

fn default_status() -> String {
    "new".to_string()
}

/// A classified lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default)]
    pub emails: Vec<String>,

    #[serde(default)]
    pub phones: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Free-form tags; absent in the input means empty
    #[serde(default)]
    pub tags: Vec<String>,

    /// new, contacted, qualified or rejected
    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub score_quality: f64,

    /// Fit score (0-10); `None` when the classifier produced none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_fit: Option<f64>,

    #[serde(default)]
    pub score_priority: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,

    #[serde(default)]
    pub issue_flags: Vec<String>,

    #[serde(default)]
    pub quality_signals: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sample: Option<String>,

    /// Fields not covered above
    #[serde(flatten)]
    pub extra: Extras,
}

impl Default for LeadRecord {
    fn default() -> Self {
        Self {
            name: None,
            domain: None,
            website: None,
            emails: Vec::new(),
            phones: Vec::new(),
            city: None,
            country: None,
            tags: Vec::new(),
            status: default_status(),
            notes: None,
            score_quality: 0.0,
            score_fit: None,
            score_priority: 0.0,
            business_type: None,
            issue_flags: Vec::new(),
            quality_signals: Vec::new(),
            content_sample: None,
            extra: Extras::new(),
        }
    }
}

impl LeadRecord {
    /// Start a record from the pre-classification lead data
    ///
    /// Scores and classification fields are left for the classifier to fill.
    pub fn from_lead(lead: &LeadData) -> Self {
        Self {
            name: lead.name.clone(),
            domain: lead.domain.clone(),
            website: lead.website.clone(),
            emails: lead.emails.clone(),
            phones: lead.phones.clone(),
            city: lead.city.clone(),
            country: lead.country.clone(),
            tags: lead.tags.clone(),
            business_type: lead.business_type.clone(),
            score_fit: lead.score_fit,
            content_sample: lead.content_sample.clone(),
            extra: lead.extra.clone(),
            ..Default::default()
        }
    }

    /// Set the fit score
    pub fn with_score_fit(mut self, score_fit: f64) -> Self {
        self.score_fit = Some(score_fit);
        self
    }

    /// Set the business type
    pub fn with_business_type(mut self, business_type: impl Into<String>) -> Self {
        self.business_type = Some(business_type.into());
        self
    }

    /// Add a tag unless it is already present
    ///
    /// Returns true if the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Channel an outreach message is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Email,
    Linkedin,
    Sms,
}

impl MessageType {
    /// Wire name of the message type
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Email => "email",
            MessageType::Linkedin => "linkedin",
            MessageType::Sms => "sms",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(MessageType::Email),
            "linkedin" => Ok(MessageType::Linkedin),
            "sms" => Ok(MessageType::Sms),
            other => Err(format!("unknown message type: {}", other)),
        }
    }
}

/// One generated outreach message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutreachVariant {
    /// problem-focused, opportunity-focused or quick-win
    pub angle: String,
    /// Subject line (email only)
    #[serde(default)]
    pub subject: String,
    pub body: String,
    /// Call to action
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub tone_used: String,
    #[serde(default)]
    pub personalization_notes: String,
    #[serde(default)]
    pub deliverability_score: u32,
    #[serde(default)]
    pub deliverability_issues: Vec<String>,
}

/// Result of outreach generation for one lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachResult {
    pub variants: Vec<OutreachVariant>,
    pub message_type: MessageType,
    /// Target language code (en, fr, de)
    pub language: String,
    pub generated_at: DateTime<Utc>,
    pub lead_name: String,
    /// True when every variant passed the deliverability checks
    pub deliverability_passed: bool,
}

impl OutreachResult {
    /// Create an empty result for a lead, stamped now
    pub fn new(lead_name: impl Into<String>, message_type: MessageType, language: impl Into<String>) -> Self {
        Self {
            variants: Vec::new(),
            message_type,
            language: language.into(),
            generated_at: Utc::now(),
            lead_name: lead_name.into(),
            deliverability_passed: true,
        }
    }

    /// Add a variant, updating the aggregate deliverability flag
    pub fn with_variant(mut self, variant: OutreachVariant, passed: bool) -> Self {
        self.deliverability_passed &= passed;
        self.variants.push(variant);
        self
    }
}
