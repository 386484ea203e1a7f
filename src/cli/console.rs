use colored::*;
use std::io::{self, Stdout, Write};

use crate::hooks::HookEvent;
use crate::plugins::PluginHost;
use crate::selfcheck::{CheckResult, SelfCheckReport};

/// Console handles all terminal output with colored formatting
pub struct Console<W: Write = Stdout> {
    out: W,
    accent: Color,
}

impl Console<Stdout> {
    /// Create a new Console writing to stdout
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for Console<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Console<W> {
    /// Create a new Console writing to any sink
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            accent: Color::BrightBlue,
        }
    }

    /// Consume the console and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a separator line
    pub fn print_separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(60).color(self.accent))
    }

    /// Print a banner with a title between separators
    pub fn print_banner(&mut self, title: &str) -> io::Result<()> {
        self.print_separator()?;
        writeln!(self.out, "{}", title.color(self.accent).bold())?;
        self.print_separator()
    }

    /// Print the full self-check report
    pub fn print_report(&mut self, report: &SelfCheckReport) -> io::Result<()> {
        self.print_banner("Export System Validation")?;

        for (index, section) in report.sections.iter().enumerate() {
            writeln!(self.out)?;
            writeln!(self.out, "{}. {}", index + 1, section.title.bold())?;

            for (position, result) in section.results.iter().enumerate() {
                // The presence check heads the section; everything after it is nested
                let indent = if position == 0 { "" } else { "  " };
                writeln!(self.out, "{}{}", indent, check_line(result))?;
            }
        }

        writeln!(self.out)?;
        self.print_separator()?;
        if report.passed() {
            writeln!(
                self.out,
                "{}",
                "✅ Validation PASSED - Export system ready!".green().bold()
            )?;
        } else {
            writeln!(
                self.out,
                "{}",
                "⚠️  Validation FAILED - Check errors above".red().bold()
            )?;
        }
        self.print_separator()?;

        writeln!(self.out)?;
        writeln!(self.out, "Next steps:")?;
        writeln!(self.out, "1. Install requirements: pip install -r requirements.txt")?;
        writeln!(self.out, "2. Run Streamlit app: streamlit run app.py")?;
        writeln!(self.out, "3. Test exports from the sidebar")?;
        writeln!(self.out, "4. Optional: Run full tests with virtual env activated")?;

        self.out.flush()
    }

    /// Print loaded plugins, their hooks and menu items, then any failures
    pub fn print_plugins(&mut self, host: &PluginHost) -> io::Result<()> {
        writeln!(self.out, "{}", "🔌 Plugins".color(self.accent).bold())?;

        if host.plugins().is_empty() {
            writeln!(self.out, "{}", "No plugins loaded".bright_black())?;
        } else {
            writeln!(self.out, "{} plugin(s) loaded", host.plugins().len())?;
        }

        for plugin in host.plugins() {
            let descriptor = &plugin.descriptor;
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{} {}",
                plugin.name.bold(),
                format!("v{}", descriptor.version).bright_black()
            )?;
            writeln!(self.out, "  {}", descriptor.description)?;

            let events = descriptor.events();
            if !events.is_empty() {
                let names: Vec<&str> = events.iter().map(HookEvent::as_str).collect();
                writeln!(self.out, "  Hooks: {}", names.join(", "))?;
            }

            if let Some(author) = &descriptor.author {
                writeln!(self.out, "  Author: {}", author)?;
            }

            for item in &descriptor.menu_items {
                match &item.icon {
                    Some(icon) => writeln!(self.out, "  {} {}", icon, item.label)?,
                    None => writeln!(self.out, "  {}", item.label)?,
                }
            }
        }

        if !host.disabled().is_empty() {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{}",
                format!("{} plugin(s) disabled", host.disabled().len()).bright_black()
            )?;
            for path in host.disabled() {
                writeln!(self.out, "  {}", path.display())?;
            }
        }

        if !host.failures().is_empty() {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{}",
                format!("{} plugin(s) failed to load", host.failures().len()).red().bold()
            )?;
            for failure in host.failures() {
                writeln!(
                    self.out,
                    "{} {}: {}",
                    "❌".red(),
                    failure.manifest_path.display(),
                    failure.error
                )?;
            }
        }

        self.out.flush()
    }

    /// Print an error message
    pub fn print_error(&mut self, error: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "Error:".red().bold(), error)
    }
}

/// Glyph and message for one check
fn check_line(result: &CheckResult) -> String {
    let message = result.message();
    if result.passed {
        format!("✅ {}", message.green())
    } else if result.informational {
        format!("ℹ️  {}", message.bright_black())
    } else {
        format!("❌ {}", message.red())
    }
}
