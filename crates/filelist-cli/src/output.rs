//! Output handling for the CLI.
//!
//! `Presenter` is the client's render sink: the file list and results go to
//! stdout, alerts go to stderr. In one-shot mode renders are held back and
//! only the final list is printed (by `list`); in the shell every render is
//! printed as it happens.

use filelist_core::{FileRecord, RenderSink};
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// How records and results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Outcome of a single command, for printing.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outcome<'a> {
    Uploaded { record: &'a FileRecord },
    Renamed { record: &'a FileRecord },
    Deleted { record: &'a FileRecord },
    Saved { id: String, location: &'a str },
}

/// CLI render sink.
pub struct Presenter {
    format: OutputFormat,
    live: bool,
    latest: Mutex<Vec<FileRecord>>,
}

impl Presenter {
    pub fn new(format: OutputFormat, live: bool) -> Self {
        Self {
            format,
            live,
            latest: Mutex::new(Vec::new()),
        }
    }

    /// Print the most recently rendered list.
    pub fn print_latest(&self) {
        let latest = self
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        self.print_records(&latest);
    }

    fn print_records(&self, records: &[FileRecord]) {
        let text = match self.format {
            OutputFormat::Table => format_table(records),
            OutputFormat::Json => format_json_lines(records),
        };
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    /// Print the result of one command.
    pub fn emit_outcome(&self, outcome: &Outcome<'_>) {
        match self.format {
            OutputFormat::Table => println!("{}", describe(outcome)),
            OutputFormat::Json => match serde_json::to_string(outcome) {
                Ok(line) => println!("{}", line),
                Err(e) => log::error!("failed to encode result: {}", e),
            },
        }
    }
}

impl RenderSink for Presenter {
    fn render(&self, records: &[FileRecord]) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = records.to_vec();
        if self.live {
            self.print_records(records);
        }
    }

    fn alert(&self, message: &str) {
        match self.format {
            OutputFormat::Table => eprintln!("{}", message),
            OutputFormat::Json => eprintln!("{}", serde_json::json!({ "alert": message })),
        }
    }
}

/// Human-readable one-liner for a command result.
fn describe(outcome: &Outcome<'_>) -> String {
    match outcome {
        Outcome::Uploaded { record } => format!("Uploaded [{}] {}", record.id, record.name),
        Outcome::Renamed { record } => format!("Renamed [{}] to {}", record.id, record.name),
        Outcome::Deleted { record } => format!("Deleted [{}] {}", record.id, record.name),
        Outcome::Saved { id, location } => format!("Saved [{}] to {}", id, location),
    }
}

/// ID/NAME table with the per-row actions.
pub fn format_table(records: &[FileRecord]) -> String {
    if records.is_empty() {
        return "(no files)".to_string();
    }

    let ids: Vec<String> = records.iter().map(|r| r.id.to_string()).collect();
    let id_width = ids.iter().map(|s| s.len()).max().unwrap_or(0).max(2);
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![format!(
        "{:<id_width$}  {:<name_width$}  ACTIONS",
        "ID", "NAME"
    )];
    for (id, record) in ids.iter().zip(records) {
        lines.push(format!(
            "{:<id_width$}  {:<name_width$}  download {id} | rename {id} | delete {id}",
            id, record.name
        ));
    }
    lines.join("\n")
}

/// One JSON object per record.
pub fn format_json_lines(records: &[FileRecord]) -> String {
    records
        .iter()
        .filter_map(|r| serde_json::to_string(r).ok())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use filelist_core::FileId;

    #[test]
    fn table_lists_rows_in_order_with_actions() {
        let table = format_table(&[FileRecord::new(1, "a.txt"), FileRecord::new(12, "longer.pdf")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  NAME"));
        assert!(lines[1].starts_with("1   a.txt"));
        assert!(lines[1].ends_with("download 1 | rename 1 | delete 1"));
        assert!(lines[2].starts_with("12  longer.pdf"));
    }

    #[test]
    fn empty_table() {
        assert_eq!(format_table(&[]), "(no files)");
    }

    #[test]
    fn json_lines_per_record() {
        let out = format_json_lines(&[
            FileRecord::new(1, "a"),
            FileRecord::new(FileId::Text("k".into()), "b"),
        ]);
        assert_eq!(out, "{\"id\":1,\"name\":\"a\"}\n{\"id\":\"k\",\"name\":\"b\"}");
    }

    #[test]
    fn outcome_json_is_tagged() {
        let record = FileRecord::new(7, "a.txt");
        let json = serde_json::to_value(Outcome::Uploaded { record: &record }).unwrap();
        assert_eq!(json["event"], "uploaded");
        assert_eq!(json["record"]["id"], 7);
        let saved = Outcome::Saved {
            id: "7".to_string(),
            location: "./a.txt",
        };
        assert_eq!(describe(&saved), "Saved [7] to ./a.txt");
    }

    #[test]
    fn deferred_presenter_keeps_latest() {
        let presenter = Presenter::new(OutputFormat::Table, false);
        presenter.render(&[FileRecord::new(1, "a")]);
        presenter.render(&[FileRecord::new(2, "b")]);
        assert_eq!(
            *presenter.latest.lock().unwrap(),
            vec![FileRecord::new(2, "b")]
        );
    }
}
