//! Logging setup
//!
//! Logs go to stderr so stdout carries only the report.
//!
//! - `LEAD_HOOKS_LOG` - `EnvFilter` directives (default `lead_hooks=warn`)
//! - `LEAD_HOOKS_LOG_FORMAT` - `json` for JSON lines, anything else for text

use std::env;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "LEAD_HOOKS_LOG";

/// Environment variable selecting the output format
pub const LOG_FORMAT_ENV: &str = "LEAD_HOOKS_LOG_FORMAT";

/// Filter used when `LEAD_HOOKS_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "lead_hooks=warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    let layer = match LogFormat::from_env() {
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(layer)
        .try_init()?;

    tracing::debug!("Logging initialized");
    Ok(())
}
