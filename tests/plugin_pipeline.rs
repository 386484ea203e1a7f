//! Drives discovery, hook dispatch and the self-check through the public API

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use tempfile::TempDir;

use lead_hooks::hooks::{Hook, HookEvent, HookFailurePolicy};
use lead_hooks::leads::{LeadData, LeadRecord, MessageType, OutreachResult};
use lead_hooks::plugins::{
    ExamplePlugin, LoadPolicy, PluginCatalog, PluginConfig, PluginDescriptor, PluginHost,
};
use lead_hooks::selfcheck::{SelfCheck, SelfCheckConfig};
use lead_hooks::LeadHooksError;

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

fn catalog() -> PluginCatalog {
    let mut catalog = PluginCatalog::with_builtins();
    catalog.insert("region_tagger", || -> anyhow::Result<PluginDescriptor> {
        Ok(PluginDescriptor::new("0.2.0", "Tags leads by country")
            .with_hook(Hook::after_classification(|mut record: LeadRecord| {
                if let Some(country) = record.country.clone() {
                    record.add_tag(&format!("region:{}", country.to_lowercase()));
                }
                Ok(record)
            }))
            .with_hook(Hook::before_outreach(|mut lead: LeadData, _: MessageType| {
                let note = lead.custom_note.take().unwrap_or_default();
                lead.custom_note = Some(format!("{} [region]", note).trim().to_string());
                Ok(lead)
            })))
    });
    catalog.insert("flaky", || -> anyhow::Result<PluginDescriptor> {
        Ok(PluginDescriptor::new("0.1.0", "Always fails")
            .with_hook(Hook::after_classification(|_record: LeadRecord| Err(anyhow!("crm offline")))))
    });
    catalog
}

#[test]
fn test_hooks_chain_across_plugins_in_manifest_order() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "10-example.json", r#"{ "entry": "example_plugin", "name": "example" }"#);
    write(temp.path(), "20-region.json", r#"{ "entry": "region_tagger" }"#);

    let host = PluginHost::load(&PluginConfig::new(temp.path()), catalog()).unwrap();
    let registry = host.registry();

    assert_eq!(
        registry.plugins_for(HookEvent::BeforeOutreach),
        vec!["example", "20-region"]
    );

    let lead = LeadData::new("Chez Paul").with_business_type("restaurant");
    let lead = registry.run_before_outreach(lead, MessageType::Email).unwrap();
    assert_eq!(
        lead.custom_note.as_deref(),
        Some("Focus on online reservations and Google My Business [region]")
    );

    let mut record = LeadRecord::from_lead(&lead).with_score_fit(9.5);
    record.country = Some("FR".to_string());
    let record = registry.run_after_classification(record).unwrap();
    assert_eq!(record.tags, vec!["high-fit", "region:fr"]);

    let result = OutreachResult::new("Chez Paul", MessageType::Email, "fr");
    registry.run_after_outreach(&result, &lead).unwrap();
}

#[test]
fn test_disabled_hooks_and_manifests() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "example.json",
        r#"{ "entry": "example_plugin", "disabled_hooks": ["before_outreach"] }"#,
    );
    write(temp.path(), "region.json", r#"{ "entry": "region_tagger", "enabled": false }"#);

    let host = PluginHost::load(&PluginConfig::new(temp.path()), catalog()).unwrap();

    assert_eq!(host.plugins().len(), 1);
    assert!(host.failures().is_empty());
    assert!(!host.registry().has_hooks(HookEvent::BeforeOutreach));
    assert_eq!(host.registry().hook_count(HookEvent::AfterClassification), 1);

    let lead = LeadData::new("Chez Paul").with_business_type("restaurant");
    let lead = host.registry().run_before_outreach(lead, MessageType::Sms).unwrap();
    assert!(lead.custom_note.is_none());
}

#[test]
fn test_failing_hook_is_isolated_by_default() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.json", r#"{ "entry": "flaky" }"#);
    let example = format!(r#"{{ "entry": "{}" }}"#, ExamplePlugin::ENTRY);
    write(temp.path(), "b.json", &example);

    let host = PluginHost::load(&PluginConfig::new(temp.path()), catalog()).unwrap();
    let record = LeadRecord::default().with_score_fit(9.0);

    let record = host.registry().run_after_classification(record).unwrap();
    assert!(record.has_tag("high-fit"));
}

#[test]
fn test_failing_hook_propagates_when_configured() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.json", r#"{ "entry": "flaky" }"#);

    let config = PluginConfig::new(temp.path()).with_hook_failure_policy(HookFailurePolicy::Propagate);
    let host = PluginHost::load(&config, catalog()).unwrap();

    let err = host
        .registry()
        .run_after_classification(LeadRecord::default())
        .unwrap_err();
    assert!(matches!(
        err,
        LeadHooksError::HookFailed { ref plugin, event: HookEvent::AfterClassification, .. } if plugin == "a"
    ));
}

#[test]
fn test_bad_manifest_skipped_or_fatal() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "good.json", r#"{ "entry": "example_plugin" }"#);
    write(temp.path(), "unknown.json", r#"{ "entry": "crm_sync" }"#);

    let host = PluginHost::load(&PluginConfig::new(temp.path()), catalog()).unwrap();
    assert_eq!(host.plugins().len(), 1);
    assert_eq!(host.failures().len(), 1);
    assert!(matches!(
        host.failures()[0].error,
        LeadHooksError::UnknownEntryPoint { .. }
    ));

    let strict = PluginConfig::new(temp.path()).with_load_policy(LoadPolicy::Strict);
    assert!(PluginHost::load(&strict, catalog()).is_err());
}

#[test]
fn test_self_check_against_a_checkout() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let functions = [
        "apply_filters",
        "export_filtered_csv",
        "export_filtered_json",
        "export_filtered_xlsx",
        "export_filtered_markdown",
        "create_consulting_pack_zip",
        "get_export_preview",
    ];
    let core: String = functions
        .iter()
        .map(|name| format!("def {}(*args, **kwargs):\n    return None\n\n\n", name))
        .collect();
    write(root, "export_advanced.py", &core);
    write(root, "export_sidebar.py", "def render_export_sidebar(project):\n    pass\n");
    write(
        root,
        "app.py",
        "from export_sidebar import render_export_sidebar\nrender_export_sidebar(project)\n",
    );
    write(root, "EXPORT_GUIDE.md", "# Export guide\n");
    write(root, "test_export.py", "import export_advanced\n");

    let report = SelfCheck::new(SelfCheckConfig::export_suite(root)).run().unwrap();
    assert!(report.passed());
    assert_eq!(report.exit_code(), 0);

    fs::remove_file(root.join("EXPORT_GUIDE.md")).unwrap();
    let report = SelfCheck::new(SelfCheckConfig::export_suite(root)).run().unwrap();
    assert_eq!(report.exit_code(), 1);
}
