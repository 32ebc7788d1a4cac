//! Table output formatting for CLI commands
//!
//! Renders sync outcomes with comfy-table. Colors are dropped when
//! `NO_COLOR` is set or the terminal is dumb.

use crate::cli::output::truncate;
use crate::services::{ActionOutcome, SyncAction};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per handled issue.
    pub fn format_outcomes(&self, outcomes: &[ActionOutcome]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Action").add_attribute(Attribute::Bold),
            Cell::new("Repository").add_attribute(Attribute::Bold),
            Cell::new("Issue").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Story").add_attribute(Attribute::Bold),
        ]);

        for outcome in outcomes {
            let action_cell = if self.use_colors {
                Cell::new(outcome.action.to_string()).fg(action_color(outcome.action))
            } else {
                Cell::new(outcome.action.to_string())
            };
            let task = outcome
                .task_name
                .as_deref()
                .or(outcome.task_gid.as_deref())
                .unwrap_or("-");

            table.add_row(vec![
                action_cell,
                Cell::new(&outcome.repository),
                Cell::new(&outcome.url),
                Cell::new(truncate(task, 60)),
                Cell::new(if outcome.comment_attached { "yes" } else { "-" }),
            ]);
        }

        table.to_string()
    }

    /// Two-column key/value table.
    pub fn format_summary(&self, rows: &[(&str, String)]) -> String {
        let mut table = self.create_base_table();
        for (key, value) in rows {
            table.add_row(vec![Cell::new(key).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn action_color(action: SyncAction) -> Color {
    match action {
        SyncAction::Create => Color::Green,
        SyncAction::Update => Color::Yellow,
        SyncAction::Skip => Color::DarkGrey,
    }
}
