use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lead_hooks::cli::Console;
use lead_hooks::logging;
use lead_hooks::plugins::{LoadPolicy, PluginCatalog, PluginConfig, PluginHost};
use lead_hooks::selfcheck::{SelfCheck, SelfCheckConfig};

#[derive(Parser)]
#[command(name = "lead-hooks")]
#[command(about = "Plugin hooks and export self-check for the lead assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the export system sources (default)
    Check {
        /// Directory holding the app sources
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Discover plugins and list their hooks
    Plugins {
        /// Manifest directory (overrides LEAD_HOOKS_PLUGINS_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Abort on the first plugin that fails to load
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<ExitCode> {
    logging::init_logging()?;

    let cli = Cli::parse();
    let mut console = Console::new();

    let code = match cli.command.unwrap_or(Commands::Check {
        root: PathBuf::from("."),
    }) {
        Commands::Check { root } => run_check(&mut console, root)?,
        Commands::Plugins { dir, strict } => run_plugins(&mut console, dir, strict)?,
    };

    Ok(ExitCode::from(code))
}

fn run_check(console: &mut Console, root: PathBuf) -> Result<u8> {
    let report = SelfCheck::new(SelfCheckConfig::export_suite(root)).run()?;
    console.print_report(&report)?;
    Ok(report.exit_code())
}

fn run_plugins(console: &mut Console, dir: Option<PathBuf>, strict: bool) -> Result<u8> {
    let mut config = PluginConfig::from_env()?;
    if let Some(dir) = dir {
        config.plugins_dir = dir;
    }
    if strict {
        config = config.with_load_policy(LoadPolicy::Strict);
    }

    tracing::info!("Scanning {} for plugins", config.plugins_dir.display());

    let host = match PluginHost::load(&config, PluginCatalog::with_builtins()) {
        Ok(host) => host,
        Err(e) => {
            console.print_error(&e.to_string())?;
            return Ok(1);
        }
    };

    console.print_plugins(&host)?;
    Ok(if host.failures().is_empty() { 0 } else { 1 })
}
