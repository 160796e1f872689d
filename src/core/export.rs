// Casetrail - core/export.rs
//
// Ascending-view serialisers and the collaborator hand-off.
// Core layer: writes to any Write trait object, never touches the
// filesystem directly (the store decides where bytes land).
//
// Every exporter works from the ascending view regardless of the
// timeline's on-screen direction.

use chrono::Local;
use std::io::Write;

use crate::core::model::{Investigation, LogEntry, Severity};
use crate::core::timeline::Timeline;
use crate::util::constants;
use crate::util::error::ExportError;

/// One row of the hand-off to the analysis/export collaborators: the raw
/// timestamp exactly as entered, the severity, and the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRow {
    pub raw_timestamp: String,
    pub severity: Severity,
    pub description: String,
}

/// The sole hand-off point to the AI-analysis and export collaborators:
/// the timeline's entries in ascending chronological order, reduced to
/// `(raw_timestamp, severity, description)` triples.
pub fn analysis_rows(timeline: &Timeline) -> Vec<AnalysisRow> {
    timeline
        .ascending_view()
        .into_iter()
        .map(|e| AnalysisRow {
            raw_timestamp: e.raw_timestamp,
            severity: e.severity,
            description: e.description,
        })
        .collect()
}

/// Render the hand-off rows as the `[timestamp] [severity] description`
/// line block collaborators embed into an analysis prompt.
pub fn analysis_block(timeline: &Timeline) -> String {
    analysis_rows(timeline)
        .iter()
        .map(|r| format!("[{}] [{}] {}", r.raw_timestamp, r.severity, r.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write entries as the snapshot CSV: a `Timestamp,Severity,Description`
/// header then one row per entry. Quoting (commas, doubled quotes, UTF-8)
/// is the csv crate's standard behaviour.
///
/// Callers pass the ascending view; this function writes what it is given.
pub fn write_csv<W: Write>(entries: &[LogEntry], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["Timestamp", "Severity", "Description"])
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for entry in entries {
        csv_writer
            .write_record([
                entry.raw_timestamp.as_str(),
                entry.severity.label(),
                entry.description.as_str(),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;
    Ok(count)
}

/// Write a numbered plain-text timeline with a generation header.
pub fn write_txt<W: Write>(
    investigation: &Investigation,
    mut writer: W,
) -> Result<usize, ExportError> {
    let entries = investigation.entries.ascending_view();
    let io = |e| ExportError::Io { source: e };

    writeln!(writer, "{} - Timeline Export", constants::APP_NAME).map_err(io)?;
    writeln!(
        writer,
        "Generated: {}",
        Local::now().format(constants::CANONICAL_DISPLAY_FORMAT)
    )
    .map_err(io)?;
    writeln!(writer, "Investigation: {}", investigation.name).map_err(io)?;
    writeln!(writer, "Total Entries: {}", entries.len()).map_err(io)?;
    writeln!(writer, "{}", "=".repeat(constants::REPORT_BANNER_WIDTH)).map_err(io)?;
    writeln!(writer).map_err(io)?;

    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            writer,
            "{:3}. [{}] [{}] {}",
            i + 1,
            entry.raw_timestamp,
            entry.severity,
            entry.description
        )
        .map_err(io)?;
    }

    Ok(entries.len())
}

/// Write entries as a JSON document with export metadata.
pub fn write_json<W: Write>(timeline: &Timeline, writer: W) -> Result<usize, ExportError> {
    let entries = timeline.ascending_view();
    let document = serde_json::json!({
        "export_time": Local::now().naive_local(),
        "total_entries": entries.len(),
        "entries": entries,
    });
    serde_json::to_writer_pretty(writer, &document).map_err(|e| ExportError::Json { source: e })?;
    Ok(entries.len())
}
