//! JSON output formatter for machine processing

use crate::domain::{ChangeEntry, Outcome};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

/// JSON representation of a run
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Terminal state, e.g. "upgraded" or "nothing_to_upgrade"
    outcome: &'static str,
    /// Offered (dry-run) or applied changes
    changes: Vec<JsonChange<'a>>,
}

/// JSON representation of a module change
#[derive(Serialize)]
struct JsonChange<'a> {
    /// Module path
    path: &'a str,
    /// Required version before the run
    from: &'a str,
    /// Target version
    to: &'a str,
    /// Release time of the target version
    #[serde(skip_serializing_if = "Option::is_none")]
    released_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a ChangeEntry> for JsonChange<'a> {
    fn from(entry: &'a ChangeEntry) -> Self {
        Self {
            path: &entry.module.path,
            from: &entry.module.version,
            to: &entry.available,
            released_at: entry.released_at,
        }
    }
}

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::NothingToUpgrade => "nothing_to_upgrade",
        Outcome::NoSelection => "no_selection",
        Outcome::Planned { .. } => "planned",
        Outcome::Upgraded { .. } => "upgraded",
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, outcome: &Outcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: self.dry_run,
            outcome: outcome_name(outcome),
            changes: outcome.changes().iter().map(JsonChange::from).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}
