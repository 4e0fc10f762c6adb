use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use pdbcompare::{Finding, Report, Severity};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Log level a finding of `severity` is reported at.
pub fn log_level(severity: Severity) -> log::Level {
    match severity {
        Severity::Debug => log::Level::Debug,
        Severity::Info => log::Level::Info,
        Severity::Warning => log::Level::Warn,
        Severity::Error => log::Level::Error,
    }
}

/// Log every finding of `report` at the level of its severity.
pub fn log_findings(report: &Report) {
    for finding in report.findings() {
        log_finding(finding);
    }
}

fn log_finding(finding: &Finding) {
    log::log!(log_level(finding.severity()), "{finding}");
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Tabular writer backed by `comfy-table`.
///
/// Columns are sized to the widest entry and separated by whitespace only.
pub struct TabWriter {
    table: Table,
}

impl TabWriter {
    /// Create a new `TabWriter` with `(header, alignment)` column definitions.
    pub fn new(columns: Vec<(&str, Align)>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let headers: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        table.set_header(headers);

        // First column: no left padding. Last column: no right padding.
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            let cell_align = match align {
                Align::Left => CellAlignment::Left,
                Align::Right => CellAlignment::Right,
            };
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(cell_align);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self { table }
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        for line in self.table.to_string().lines() {
            println!("{}", line.trim_end());
        }
    }
}

/// Print the number of findings per kind, followed by the error total.
pub fn print_summary(report: &Report) {
    let mut table = TabWriter::new(vec![
        ("KIND", Align::Left),
        ("SEVERITY", Align::Left),
        ("COUNT", Align::Right),
    ]);
    for (kind, count) in report.counts() {
        table.row(vec![
            kind.to_string(),
            kind.severity().to_string(),
            count.to_string(),
        ]);
    }
    table.print();
    println!();
    println!("{} error(s)", report.error_count());
}
