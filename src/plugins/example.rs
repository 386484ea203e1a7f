//! Example plugin
//!
//! Shows the plugin API end to end: one hook per lifecycle event and a menu
//! item. Point a manifest at it with `{ "entry": "example_plugin" }`.

use crate::hooks::Hook;
use crate::leads::{LeadData, LeadRecord, MessageType, OutreachResult};

use super::catalog::Plugin;
use super::descriptor::{MenuItem, PluginDescriptor};

/// Fit score at which a lead is tagged high-fit
pub const HIGH_FIT_THRESHOLD: f64 = 9.0;

/// Tag added to leads at or above the threshold
pub const HIGH_FIT_TAG: &str = "high-fit";

/// Note attached to restaurant leads before outreach
pub const RESTAURANT_NOTE: &str = "Focus on online reservations and Google My Business";

/// The example plugin shipped in the builtin catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct ExamplePlugin;

impl ExamplePlugin {
    /// Catalog key for this plugin
    pub const ENTRY: &'static str = "example_plugin";
}

impl Plugin for ExamplePlugin {
    fn register(&self) -> anyhow::Result<PluginDescriptor> {
        Ok(
            PluginDescriptor::new("1.0.0", "Example plugin demonstrating the plugin API")
                .with_author("Lead Hunter Team")
                .with_hook(Hook::before_classification(before_classification))
                .with_hook(Hook::after_classification(after_classification))
                .with_hook(Hook::before_outreach(before_outreach))
                .with_hook(Hook::after_outreach(after_outreach))
                .with_menu_item(MenuItem::new("Example Plugin Action", example_action).with_icon("🔌")),
        )
    }
}

/// Pass the lead through untouched
pub fn before_classification(lead: LeadData) -> anyhow::Result<LeadData> {
    Ok(lead)
}

/// Tag leads with a fit score of 9 or more as high-fit, once
pub fn after_classification(mut record: LeadRecord) -> anyhow::Result<LeadRecord> {
    if record.score_fit.unwrap_or(0.0) >= HIGH_FIT_THRESHOLD {
        record.add_tag(HIGH_FIT_TAG);
    }
    Ok(record)
}

/// Give the outreach writer extra context for restaurants
pub fn before_outreach(mut lead: LeadData, _message_type: MessageType) -> anyhow::Result<LeadData> {
    if lead.business_type.as_deref() == Some("restaurant") {
        lead.custom_note = Some(RESTAURANT_NOTE.to_string());
    }
    Ok(lead)
}

/// Record the outreach run for analytics
pub fn after_outreach(result: &OutreachResult, lead: &LeadData) -> anyhow::Result<()> {
    tracing::info!(
        "[ExamplePlugin] {} {} variant(s) generated for {} (deliverability passed: {})",
        result.variants.len(),
        result.message_type,
        lead.display_name(),
        result.deliverability_passed
    );
    Ok(())
}

fn example_action() -> anyhow::Result<String> {
    tracing::info!("[ExamplePlugin] Example plugin action triggered");
    Ok("Plugin action executed successfully".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookEvent;

    fn record(score_fit: Option<f64>, tags: &[&str]) -> LeadRecord {
        LeadRecord {
            score_fit,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn high_fit_count(record: &LeadRecord) -> usize {
        record.tags.iter().filter(|t| *t == HIGH_FIT_TAG).count()
    }

    #[test]
    fn test_register_descriptor() {
        let descriptor = ExamplePlugin.register().unwrap();

        assert_eq!(descriptor.version, "1.0.0");
        assert_eq!(descriptor.author.as_deref(), Some("Lead Hunter Team"));
        assert_eq!(descriptor.events(), HookEvent::ALL.to_vec());
        assert_eq!(descriptor.menu_items.len(), 1);
        assert_eq!(descriptor.menu_items[0].label, "Example Plugin Action");
        assert_eq!(descriptor.menu_items[0].icon.as_deref(), Some("🔌"));
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_high_fit_tag_added_once() {
        for tags in [&[][..], &["local"][..], &["high-fit"][..], &["high-fit", "local"][..]] {
            let out = after_classification(record(Some(9.0), tags)).unwrap();
            assert_eq!(high_fit_count(&out), 1, "tags before: {:?}", tags);
        }

        let out = after_classification(record(Some(9.8), &[])).unwrap();
        assert_eq!(out.tags, vec![HIGH_FIT_TAG.to_string()]);
    }

    #[test]
    fn test_low_or_missing_fit_leaves_tags() {
        for score in [Some(8.99), Some(0.0), None] {
            let before = record(score, &["local"]);
            let out = after_classification(before.clone()).unwrap();
            assert_eq!(out.tags, before.tags);
        }
    }

    #[test]
    fn test_high_fit_idempotent() {
        let once = after_classification(record(Some(10.0), &["seo"])).unwrap();
        let twice = after_classification(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_restaurant_note() {
        let lead = LeadData::new("Chez Paul").with_business_type("restaurant");
        let out = before_outreach(lead, MessageType::Email).unwrap();
        assert_eq!(out.custom_note.as_deref(), Some(RESTAURANT_NOTE));
    }

    #[test]
    fn test_other_business_types_untouched() {
        let lead = LeadData::new("Joe's Plumbing").with_business_type("plumber");
        let out = before_outreach(lead, MessageType::Linkedin).unwrap();
        assert!(out.custom_note.is_none());

        let mut lead = LeadData::new("Dental Co").with_business_type("dentist");
        lead.custom_note = Some("Set by CRM".to_string());
        let out = before_outreach(lead, MessageType::Sms).unwrap();
        assert_eq!(out.custom_note.as_deref(), Some("Set by CRM"));

        let out = before_outreach(LeadData::new("No type"), MessageType::Email).unwrap();
        assert!(out.custom_note.is_none());
    }

    #[test]
    fn test_menu_action() {
        let descriptor = ExamplePlugin.register().unwrap();
        assert_eq!(
            descriptor.menu_items[0].run().unwrap(),
            "Plugin action executed successfully"
        );
    }
}
