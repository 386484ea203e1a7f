//! Individual diagnostics
//!
//! Each check produces a `CheckResult`. Missing files and syntax errors are
//! failed checks, not errors; only unexpected I/O failures return `Err`.

use std::fs;
use std::path::Path;

use crate::core::LeadHooksResult;

use super::python::{Detection, PythonModule};

/// What a check looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// A file is present
    FileExists,
    /// A Python file parses
    SyntaxValid,
    /// A Python file defines a named function
    FunctionDefined,
    /// A file contains an expected line
    IntegrationMarker,
    /// A directory is present (informational)
    DirectoryPresent,
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// What kind of check ran
    pub kind: CheckKind,
    /// Human label, e.g. "Core module" or "Export sidebar import"
    pub subject: String,
    /// What was checked: a path, a function name or a marker
    pub target: String,
    /// Whether it passed
    pub passed: bool,
    /// Extra context, e.g. the syntax error
    pub detail: Option<String>,
    /// Informational checks never affect the verdict
    pub informational: bool,
}

impl CheckResult {
    fn new(kind: CheckKind, subject: impl Into<String>, target: impl Into<String>, passed: bool) -> Self {
        Self {
            kind,
            subject: subject.into(),
            target: target.into(),
            passed,
            detail: None,
            informational: false,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Whether this check counts toward the overall verdict
    pub fn counts(&self) -> bool {
        !self.informational
    }

    /// One-line report message, without the status glyph
    pub fn message(&self) -> String {
        match (self.kind, self.passed) {
            (CheckKind::FileExists, true) => format!("{}: {}", self.subject, self.target),
            (CheckKind::FileExists, false) => format!("{} NOT FOUND: {}", self.subject, self.target),
            (CheckKind::SyntaxValid, true) => "Syntax valid".to_string(),
            (CheckKind::SyntaxValid, false) => format!(
                "Syntax error: {}",
                self.detail.as_deref().unwrap_or("invalid syntax")
            ),
            (CheckKind::FunctionDefined, true) => match self.detail.as_deref() {
                Some(detail) => format!("Function '{}' defined ({})", self.target, detail),
                None => format!("Function '{}' defined", self.target),
            },
            (CheckKind::FunctionDefined, false) => format!("Function '{}' NOT defined", self.target),
            (CheckKind::IntegrationMarker, true) => format!("{} found", self.subject),
            (CheckKind::IntegrationMarker, false) => format!("{} NOT found", self.subject),
            (CheckKind::DirectoryPresent, true) => format!("{} exists: {}", self.subject, self.target),
            (CheckKind::DirectoryPresent, false) => {
                format!("{} will be created on first export", self.subject)
            }
        }
    }
}

/// Check that a file is present
///
/// `display` is the path as shown in the report.
pub fn check_file_exists(path: &Path, display: &str, subject: &str) -> CheckResult {
    CheckResult::new(CheckKind::FileExists, subject, display, path.is_file())
}

/// Check that a directory is present; never affects the verdict
pub fn check_directory_present(path: &Path, display: &str, subject: &str) -> CheckResult {
    let mut result = CheckResult::new(CheckKind::DirectoryPresent, subject, display, path.is_dir());
    result.informational = true;
    result
}

fn syntax_result(module: &PythonModule, display: &str) -> CheckResult {
    match module.syntax_error() {
        None => CheckResult::new(CheckKind::SyntaxValid, "Syntax", display, true),
        Some(error) => {
            CheckResult::new(CheckKind::SyntaxValid, "Syntax", display, false).with_detail(error.to_string())
        }
    }
}

fn function_result(module: &PythonModule, name: &str) -> CheckResult {
    match module.find_function(name) {
        Some(Detection::SyntaxTree) => CheckResult::new(CheckKind::FunctionDefined, "Function", name, true),
        Some(Detection::Textual) => {
            CheckResult::new(CheckKind::FunctionDefined, "Function", name, true).with_detail("text match")
        }
        None => CheckResult::new(CheckKind::FunctionDefined, "Function", name, false),
    }
}

/// Parse a Python file and check its syntax
pub fn check_syntax_valid(path: &Path) -> LeadHooksResult<CheckResult> {
    let module = PythonModule::load(path)?;
    Ok(syntax_result(&module, &path.display().to_string()))
}

/// Parse a Python file and check that it defines a function
pub fn check_function_defined(path: &Path, name: &str) -> LeadHooksResult<CheckResult> {
    let module = PythonModule::load(path)?;
    Ok(function_result(&module, name))
}

/// Parse a Python file once and check each function, one result per name
pub fn check_functions_defined<S: AsRef<str>>(path: &Path, names: &[S]) -> LeadHooksResult<Vec<CheckResult>> {
    let module = PythonModule::load(path)?;
    Ok(names
        .iter()
        .map(|name| function_result(&module, name.as_ref()))
        .collect())
}

/// An expected line in an integration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationMarker {
    /// Human label, e.g. "Export sidebar import"
    pub label: String,
    /// Text that must appear verbatim
    pub needle: String,
}

impl IntegrationMarker {
    /// Create a marker
    pub fn new(label: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            needle: needle.into(),
        }
    }
}

fn marker_results(content: &str, markers: &[IntegrationMarker]) -> Vec<CheckResult> {
    markers
        .iter()
        .map(|marker| {
            CheckResult::new(
                CheckKind::IntegrationMarker,
                &marker.label,
                &marker.needle,
                content.contains(&marker.needle),
            )
        })
        .collect()
}

/// Read a file and check it for each marker
pub fn check_integration_markers(path: &Path, markers: &[IntegrationMarker]) -> LeadHooksResult<Vec<CheckResult>> {
    let content = fs::read_to_string(path)?;
    Ok(marker_results(&content, markers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("EXPORT_GUIDE.md");

        let missing = check_file_exists(&path, "EXPORT_GUIDE.md", "Export guide");
        assert!(!missing.passed);
        assert_eq!(missing.message(), "Export guide NOT FOUND: EXPORT_GUIDE.md");

        fs::write(&path, "# Guide").unwrap();
        let present = check_file_exists(&path, "EXPORT_GUIDE.md", "Export guide");
        assert!(present.passed);
        assert_eq!(present.message(), "Export guide: EXPORT_GUIDE.md");
    }

    #[test]
    fn test_directory_is_informational() {
        let temp = TempDir::new().unwrap();
        let result = check_directory_present(&temp.path().join("out"), "out", "Output directory");

        assert!(!result.passed);
        assert!(!result.counts());
        assert_eq!(result.message(), "Output directory will be created on first export");
    }

    #[test]
    fn test_syntax_checks() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.py");
        let bad = temp.path().join("bad.py");
        fs::write(&good, "def render_export_sidebar(project):\n    return project\n").unwrap();
        fs::write(&bad, "def render_export_sidebar(project)\n    return project\n").unwrap();

        let result = check_syntax_valid(&good).unwrap();
        assert!(result.passed);
        assert_eq!(result.message(), "Syntax valid");

        let result = check_syntax_valid(&bad).unwrap();
        assert!(!result.passed);
        assert!(result.message().starts_with("Syntax error: "));
    }

    #[test]
    fn test_function_defined() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("export_sidebar.py");
        fs::write(&path, "def render_export_sidebar(project):\n    pass\n").unwrap();

        let found = check_function_defined(&path, "render_export_sidebar").unwrap();
        assert!(found.passed);
        assert_eq!(found.message(), "Function 'render_export_sidebar' defined");

        let missing = check_function_defined(&path, "get_export_preview").unwrap();
        assert!(!missing.passed);
        assert_eq!(missing.message(), "Function 'get_export_preview' NOT defined");
    }

    #[test]
    fn test_functions_defined_in_one_pass() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("export_advanced.py");
        fs::write(&path, "def apply_filters(leads):\n    pass\n").unwrap();

        let results = check_functions_defined(&path, &["apply_filters", "get_export_preview"]).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].passed);
        assert!(!results[1].passed);
    }

    #[test]
    fn test_python2_print_fails_syntax_check() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("export_sidebar.py");
        fs::write(&path, "def render_export_sidebar(project):\n    print \"hi\"\n").unwrap();

        let result = check_syntax_valid(&path).unwrap();
        assert!(!result.passed);
        assert!(result.message().contains("Missing parentheses in call to 'print'"));
    }

    #[test]
    fn test_integration_markers_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.py");
        fs::write(&path, "render_export_sidebar(project)\n").unwrap();

        let markers = vec![IntegrationMarker::new("Export sidebar render call", "render_export_sidebar(project)")];
        let results = check_integration_markers(&path, &markers).unwrap();
        assert!(results[0].passed);
    }

    #[test]
    fn test_missing_file_is_an_error_for_parsing_checks() {
        let temp = TempDir::new().unwrap();
        assert!(check_syntax_valid(&temp.path().join("nope.py")).is_err());
    }

    #[test]
    fn test_markers() {
        let markers = vec![
            IntegrationMarker::new("Export sidebar import", "from export_sidebar import render_export_sidebar"),
            IntegrationMarker::new("Export sidebar render call", "render_export_sidebar(project)"),
        ];

        let results = marker_results("from export_sidebar import render_export_sidebar\n", &markers);
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[0].message(), "Export sidebar import found");
        assert_eq!(results[1].message(), "Export sidebar render call NOT found");
    }
}
