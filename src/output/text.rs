//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Human-readable outcome display with colors
//! - Semantic version change type indication (major/minor/patch)
//! - The notices printed while the pipeline runs

use crate::domain::{ChangeEntry, ModuleVersion, Outcome};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two module versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        let parse = |v: &str| -> Option<(u64, u64)> {
            let v = v.strip_prefix('v').unwrap_or(v);
            let mut parts = v.split(['.', '-', '+']);
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
            Some((major, minor))
        };

        match (parse(old), parse(new)) {
            (Some((old_major, old_minor)), Some((new_major, new_minor))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        match (self.dry_run, self.color) {
            (false, _) => String::new(),
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
        }
    }

    fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
        if count == 1 {
            one
        } else {
            many
        }
    }

    /// Format a single change line
    fn format_change_line(
        &self,
        change: &ChangeEntry,
        max_path_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change_type = VersionChangeType::from_versions(&change.module.version, &change.available);
        let date_display = match (self.verbosity, change.released_at) {
            (Verbosity::Verbose, Some(d)) => format!(" ({})", d.format("%Y/%m/%d %H:%M")),
            _ => String::new(),
        };

        if self.color {
            writeln!(
                writer,
                "  {} {} {} {} [{}]{}",
                format!("{:width$}", change.module.path, width = max_path_len),
                change.module.version.dimmed(),
                "→".dimmed(),
                change.available.bright_white().bold(),
                change_type.colored_label(),
                date_display.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                change.module.path,
                change.module.version,
                change.available,
                change_type.label(),
                date_display,
                width = max_path_len
            )
        }
    }

    /// Format a list of changes under a header
    fn format_changes(
        &self,
        header: &str,
        changes: &[ChangeEntry],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.color {
            writeln!(writer, "{}{}", self.dry_run_prefix(), header.bold())?;
        } else {
            writeln!(writer, "{}{}", self.dry_run_prefix(), header)?;
        }

        let max_path_len = changes
            .iter()
            .map(|c| c.module.path.len())
            .max()
            .unwrap_or(0)
            .max(20);
        for change in changes {
            self.format_change_line(change, max_path_len, writer)?;
        }
        Ok(())
    }

    /// One-line summary used in quiet mode
    fn format_quiet(&self, outcome: &Outcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let line = match outcome {
            Outcome::NothingToUpgrade => "No updates".to_string(),
            Outcome::NoSelection => "Nothing selected".to_string(),
            Outcome::Planned { changes } => format!("{} upgradable", changes.len()),
            Outcome::Upgraded { changes } => format!("{} upgraded", changes.len()),
        };
        writeln!(writer, "{}{}", prefix, line)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, outcome: &Outcome, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_quiet(outcome, writer);
        }

        match outcome {
            Outcome::NothingToUpgrade => {
                let message = "All direct modules are up to date.";
                if self.color {
                    writeln!(writer, "{} {}", "✓".green(), message.green())
                } else {
                    writeln!(writer, "{}", message)
                }
            }
            Outcome::NoSelection => {
                let message = "No modules selected, go.mod left unchanged.";
                if self.color {
                    writeln!(writer, "{}", message.dimmed())
                } else {
                    writeln!(writer, "{}", message)
                }
            }
            Outcome::Planned { changes } => {
                let header = format!(
                    "{} {} available:",
                    changes.len(),
                    Self::plural(changes.len(), "upgrade", "upgrades")
                );
                self.format_changes(&header, changes, writer)
            }
            Outcome::Upgraded { changes } => {
                let header = format!(
                    "Upgraded {} {}:",
                    changes.len(),
                    Self::plural(changes.len(), "module", "modules")
                );
                self.format_changes(&header, changes, writer)?;
                if self.color {
                    writeln!(writer, "{} {}", "✓".green(), "go.mod tidied".green())
                } else {
                    writeln!(writer, "go.mod tidied")
                }
            }
        }
    }
}

/// Listing of the modules about to be queried
pub fn candidates_notice(modules: &[ModuleVersion]) -> String {
    let mut lines = vec![format!("{}", "Direct modules:".bold())];
    lines.extend(modules.iter().map(|module| format!("  {}", module)));
    lines.join("\n")
}

/// Notice for a direct requirement replaced by a local directory
pub fn local_skip_notice(path: &str) -> String {
    format!(
        "{} {} is replaced by a local directory, skipping",
        "!".yellow().bold(),
        path.yellow()
    )
}

/// Echo of the operator's selection
pub fn selection_notice(selection: &[ChangeEntry]) -> String {
    let mut lines = vec![format!("{}", "Selected:".bold())];
    lines.extend(selection.iter().map(|change| format!("  {}", change.label)));
    lines.join("\n")
}
