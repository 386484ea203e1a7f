//! Self-check runner
//!
//! Runs every check in a fixed order and groups the results into report
//! sections. Checks that depend on a file being present are skipped when
//! it is missing; the missing-file result already fails the section.

use std::path::Path;

use crate::core::LeadHooksResult;

use super::checks::{
    check_directory_present, check_file_exists, check_functions_defined, check_integration_markers,
    check_syntax_valid, CheckResult,
};
use super::config::{ModuleTarget, PresenceTarget, SelfCheckConfig};

/// A titled group of check results
#[derive(Debug, Clone)]
pub struct CheckSection {
    /// Heading, e.g. "Checking export_advanced.py..."
    pub title: String,
    /// Results in the order they ran
    pub results: Vec<CheckResult>,
}

impl CheckSection {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            results: Vec::new(),
        }
    }

    /// True when every counted check in this section passed
    pub fn passed(&self) -> bool {
        self.results.iter().filter(|r| r.counts()).all(|r| r.passed)
    }
}

/// Results of a full self-check
#[derive(Debug, Clone, Default)]
pub struct SelfCheckReport {
    /// Sections in the order they ran
    pub sections: Vec<CheckSection>,
}

impl SelfCheckReport {
    /// Overall verdict: every non-informational check passed
    pub fn passed(&self) -> bool {
        self.sections.iter().all(CheckSection::passed)
    }

    /// 0 on success, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Every counted check that failed
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.sections
            .iter()
            .flat_map(|s| s.results.iter())
            .filter(|r| r.counts() && !r.passed)
    }

    /// Number of checks that ran
    pub fn check_count(&self) -> usize {
        self.sections.iter().map(|s| s.results.len()).sum()
    }
}

/// Runs the self-check against a config
#[derive(Debug, Clone)]
pub struct SelfCheck {
    config: SelfCheckConfig,
}

impl SelfCheck {
    /// Create a runner
    pub fn new(config: SelfCheckConfig) -> Self {
        Self { config }
    }

    /// The config being checked
    pub fn config(&self) -> &SelfCheckConfig {
        &self.config
    }

    /// Run all checks
    ///
    /// Returns `Err` only for I/O failures on files that exist, or when the
    /// parser cannot be set up.
    pub fn run(&self) -> LeadHooksResult<SelfCheckReport> {
        tracing::debug!("[SelfCheck] Checking {}", self.config.root.display());

        let sections = vec![
            self.check_module(&self.config.core_module)?,
            self.check_module(&self.config.sidebar_module)?,
            self.check_integration()?,
            self.check_presence("Checking documentation...", &self.config.guide),
            self.check_presence("Checking test file...", &self.config.test_script),
            self.check_output_dir(),
        ];

        let report = SelfCheckReport { sections };
        tracing::info!(
            "[SelfCheck] {} checks, {} failed",
            report.check_count(),
            report.failures().count()
        );

        Ok(report)
    }

    fn check_module(&self, target: &ModuleTarget) -> LeadHooksResult<CheckSection> {
        let display = display_path(&target.path);
        let mut section = CheckSection::new(format!("Checking {}...", display));

        let path = self.config.resolve(&target.path);
        let exists = check_file_exists(&path, &display, &target.label);
        let present = exists.passed;
        section.results.push(exists);
        if !present {
            return Ok(section);
        }

        section.results.push(check_syntax_valid(&path)?);
        section
            .results
            .extend(check_functions_defined(&path, &target.functions)?);

        Ok(section)
    }

    fn check_integration(&self) -> LeadHooksResult<CheckSection> {
        let target = &self.config.app;
        let display = display_path(&target.path);
        let mut section = CheckSection::new(format!("Checking {} integration...", display));

        let path = self.config.resolve(&target.path);
        let exists = check_file_exists(&path, &display, &target.label);
        let present = exists.passed;
        section.results.push(exists);
        if !present {
            return Ok(section);
        }

        section
            .results
            .extend(check_integration_markers(&path, &target.markers)?);

        Ok(section)
    }

    fn check_presence(&self, title: &str, target: &PresenceTarget) -> CheckSection {
        let mut section = CheckSection::new(title);
        let path = self.config.resolve(&target.path);
        section
            .results
            .push(check_file_exists(&path, &display_path(&target.path), &target.label));
        section
    }

    fn check_output_dir(&self) -> CheckSection {
        let target = &self.config.output_dir;
        let mut section = CheckSection::new("Checking output directory...");
        let path = self.config.resolve(&target.path);
        section
            .results
            .push(check_directory_present(&path, &display_path(&target.path), &target.label));
        section
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
