// Casetrail - core/import.rs
//
// CSV import of previously exported (or hand-assembled) timelines.
//
// Imported rows funnel through `Timeline::insert`, so validation,
// normalisation, and id assignment are identical to form-submitted
// entries. Rows missing a timestamp or description are skipped and
// counted rather than failing the import.

use std::io::Read;

use crate::core::model::Severity;
use crate::core::timeline::Timeline;
use crate::util::constants;
use crate::util::error::ImportError;

/// Outcome counts for one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Rows that became timeline entries.
    pub imported: usize,
    /// Rows skipped for a blank timestamp or description.
    pub skipped: usize,
}

/// Column names recognised in the header row (case-insensitive).
const COL_TIMESTAMP: &str = "timestamp";
const COL_SEVERITY: &str = "severity";
const COL_DESCRIPTION: &str = "description";

/// Import entries from CSV data with a `Timestamp,Severity,Description`
/// header. Extra columns (such as the `Parsed Time` column older exports
/// carried) are ignored. A missing `Severity` column is tolerated: rows
/// default to `Info`.
pub fn import_csv<R: Read>(reader: R, timeline: &mut Timeline) -> Result<ImportSummary, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ImportError::Csv { source: e })?;

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let ts_col = find(COL_TIMESTAMP).ok_or(ImportError::MissingHeader {
        expected: "Timestamp",
    })?;
    let desc_col = find(COL_DESCRIPTION).ok_or(ImportError::MissingHeader {
        expected: "Description",
    })?;
    let sev_col = find(COL_SEVERITY);

    let mut summary = ImportSummary::default();

    for (row_index, record) in csv_reader.records().enumerate() {
        if row_index >= constants::MAX_IMPORT_ROWS {
            return Err(ImportError::TooManyRows {
                max: constants::MAX_IMPORT_ROWS,
            });
        }

        let record = record.map_err(|e| ImportError::Csv { source: e })?;
        let timestamp = record.get(ts_col).unwrap_or("").trim();
        let description = record.get(desc_col).unwrap_or("").trim();

        if timestamp.is_empty() || description.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let severity = sev_col
            .and_then(|c| record.get(c))
            .map(Severity::parse)
            .unwrap_or_default();

        match timeline.insert(timestamp, description, severity) {
            Ok(entry) => {
                if entry.degraded {
                    tracing::warn!(
                        row = row_index + 2, // 1-based, after the header
                        raw = timestamp,
                        "imported entry has an unparseable timestamp"
                    );
                }
                summary.imported += 1;
            }
            Err(e) => {
                // Blank fields were filtered above; anything else is still
                // a per-row condition, not an import failure.
                tracing::warn!(row = row_index + 2, error = %e, "skipping invalid row");
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV import complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_basic_rows() {
        let data = "Timestamp,Severity,Description\n\
                    2024-01-15 10:00:00,High,lateral movement to DC01\n\
                    2024-01-14 09:00:00,Critical,initial access\n";
        let mut tl = Timeline::new();
        let summary = import_csv(data.as_bytes(), &mut tl).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(tl.len(), 2);
        assert_eq!(tl.entries()[0].severity, Severity::High);
    }

    #[test]
    fn test_import_skips_incomplete_rows() {
        let data = "Timestamp,Severity,Description\n\
                    ,High,no timestamp\n\
                    2024-01-15 10:00:00,Low,\n\
                    2024-01-15 11:00:00,Low,kept\n";
        let mut tl = Timeline::new();
        let summary = import_csv(data.as_bytes(), &mut tl).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(tl.entries()[0].description, "kept");
    }

    #[test]
    fn test_import_normalises_severity_case() {
        let data = "Timestamp,Severity,Description\n\
                    2024-01-15 10:00:00,information,alias maps to Info\n\
                    2024-01-15 11:00:00,CRITICAL,case folded\n\
                    2024-01-15 12:00:00,unheard-of,defaults to Info\n";
        let mut tl = Timeline::new();
        import_csv(data.as_bytes(), &mut tl).unwrap();

        assert_eq!(tl.entries()[0].severity, Severity::Info);
        assert_eq!(tl.entries()[1].severity, Severity::Critical);
        assert_eq!(tl.entries()[2].severity, Severity::Info);
    }

    #[test]
    fn test_import_without_severity_column_defaults_info() {
        let data = "Timestamp,Description\n\
                    2024-01-15 10:00:00,no severity column at all\n";
        let mut tl = Timeline::new();
        let summary = import_csv(data.as_bytes(), &mut tl).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(tl.entries()[0].severity, Severity::Info);
    }

    #[test]
    fn test_import_ignores_extra_columns() {
        let data = "Timestamp,Severity,Description,Parsed Time\n\
                    2024-01-15 10:00:00,Low,entry,2024-01-15 10:00:00\n";
        let mut tl = Timeline::new();
        let summary = import_csv(data.as_bytes(), &mut tl).unwrap();
        assert_eq!(summary.imported, 1);
    }

    #[test]
    fn test_import_missing_required_header_fails() {
        let data = "When,What\n2024-01-15 10:00:00,something\n";
        let mut tl = Timeline::new();
        let err = import_csv(data.as_bytes(), &mut tl).unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader { expected: "Timestamp" }));
    }

    #[test]
    fn test_import_quoted_fields_round_trip() {
        let data = "Timestamp,Severity,Description\n\
                    \"2024-01-15 10:00:00\",\"High\",\"ran \"\"net user\"\", then pivoted\"\n";
        let mut tl = Timeline::new();
        import_csv(data.as_bytes(), &mut tl).unwrap();
        assert_eq!(tl.entries()[0].description, r#"ran "net user", then pivoted"#);
    }

    #[test]
    fn test_import_unparseable_timestamp_still_imports_degraded() {
        let data = "Timestamp,Severity,Description\nbanana,Low,fuzzy time\n";
        let mut tl = Timeline::new();
        let summary = import_csv(data.as_bytes(), &mut tl).unwrap();
        assert_eq!(summary.imported, 1);
        assert!(tl.entries()[0].degraded);
    }
}
