//! Export system self-check
//!
//! Static diagnostics over a checkout of the lead-generation app: required
//! files are present, Python modules parse and define the expected
//! functions, and the main app wires in the export sidebar. Nothing is
//! executed or imported.

mod checks;
mod config;
mod python;
mod runner;

pub use checks::{
    check_directory_present, check_file_exists, check_function_defined, check_functions_defined,
    check_integration_markers, check_syntax_valid, CheckKind, CheckResult, IntegrationMarker,
};
pub use config::{IntegrationTarget, ModuleTarget, PresenceTarget, SelfCheckConfig};
pub use python::{defines_function_textually, Detection, PythonModule, SyntaxError};
pub use runner::{CheckSection, SelfCheck, SelfCheckReport};
