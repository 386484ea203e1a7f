//! Self-check targets
//!
//! The export suite checks a fixed set of files. Paths are relative to a
//! root directory, which defaults to the current directory.

use std::path::{Path, PathBuf};

use super::checks::IntegrationMarker;

/// A Python module that must exist, parse and define some functions
#[derive(Debug, Clone)]
pub struct ModuleTarget {
    /// Path relative to the root
    pub path: PathBuf,
    /// Label in the report, e.g. "Core module"
    pub label: String,
    /// Functions that must be defined
    pub functions: Vec<String>,
}

impl ModuleTarget {
    /// Create a module target
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>, functions: &[&str]) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            functions: functions.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A file that must contain integration lines
#[derive(Debug, Clone)]
pub struct IntegrationTarget {
    /// Path relative to the root
    pub path: PathBuf,
    /// Label in the report, e.g. "Main app"
    pub label: String,
    /// Lines that must appear
    pub markers: Vec<IntegrationMarker>,
}

/// A file or directory that only needs to exist
#[derive(Debug, Clone)]
pub struct PresenceTarget {
    /// Path relative to the root
    pub path: PathBuf,
    /// Label in the report
    pub label: String,
}

impl PresenceTarget {
    /// Create a presence target
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

/// Everything the self-check looks at
#[derive(Debug, Clone)]
pub struct SelfCheckConfig {
    /// Directory the relative paths are resolved against
    pub root: PathBuf,
    /// `export_advanced.py`
    pub core_module: ModuleTarget,
    /// `export_sidebar.py`
    pub sidebar_module: ModuleTarget,
    /// `app.py`
    pub app: IntegrationTarget,
    /// `EXPORT_GUIDE.md`
    pub guide: PresenceTarget,
    /// `test_export.py`
    pub test_script: PresenceTarget,
    /// `out/`, informational only
    pub output_dir: PresenceTarget,
}

impl Default for SelfCheckConfig {
    fn default() -> Self {
        Self::export_suite(".")
    }
}

impl SelfCheckConfig {
    /// The export suite, rooted at `root`
    pub fn export_suite(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            core_module: ModuleTarget::new(
                "export_advanced.py",
                "Core module",
                &[
                    "apply_filters",
                    "export_filtered_csv",
                    "export_filtered_json",
                    "export_filtered_xlsx",
                    "export_filtered_markdown",
                    "create_consulting_pack_zip",
                    "get_export_preview",
                ],
            ),
            sidebar_module: ModuleTarget::new("export_sidebar.py", "Sidebar module", &["render_export_sidebar"]),
            app: IntegrationTarget {
                path: PathBuf::from("app.py"),
                label: "Main app".to_string(),
                markers: vec![
                    IntegrationMarker::new(
                        "Export sidebar import",
                        "from export_sidebar import render_export_sidebar",
                    ),
                    IntegrationMarker::new("Export sidebar render call", "render_export_sidebar(project)"),
                ],
            },
            guide: PresenceTarget::new("EXPORT_GUIDE.md", "Export guide"),
            test_script: PresenceTarget::new("test_export.py", "Test script"),
            output_dir: PresenceTarget::new("out", "Output directory"),
        }
    }

    /// Change the root directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Resolve a target path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}
