// ── CSV export ──
//
// Every field is quoted and embedded quotes are doubled, so commas and
// quotes inside root-cause names never split a cell.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::error::CoreError;
use crate::model::RootCauseResult;

pub const EXPORT_FILE_NAME: &str = "alarm_results.csv";

pub const EXPORT_HEADERS: [&str; 7] = [
    "ID",
    "Start Time",
    "End Time",
    "Root Cause",
    "Alarm Code",
    "Class",
    "Priority",
];

/// Write `results` as CSV to `writer`.
pub fn write_csv<W: Write>(results: &[RootCauseResult], writer: W) -> Result<(), CoreError> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(EXPORT_HEADERS)?;
    for r in results {
        let (start, end, priority) = (r.start_label(), r.end_label(), r.priority.to_string());
        let row: [&str; 7] = [
            &r.id,
            &start,
            &end,
            &r.root_cause_name,
            &r.alarm_code,
            &r.class,
            &priority,
        ];
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(results: &[RootCauseResult]) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    write_csv(results, &mut buf)?;
    String::from_utf8(buf).map_err(|e| CoreError::Io(std::io::Error::other(e)))
}

/// Write `results` to `path`. An empty set is refused rather than
/// producing a header-only file.
pub fn export_to_path(results: &[RootCauseResult], path: &Path) -> Result<usize, CoreError> {
    if results.is_empty() {
        return Err(CoreError::NothingToExport);
    }
    let file = File::create(path)?;
    write_csv(results, file)?;
    info!(path = %path.display(), rows = results.len(), "exported results");
    Ok(results.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample(name: &str) -> RootCauseResult {
        RootCauseResult {
            id: "A1".into(),
            start_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()),
            end_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap()),
            root_cause_name: name.into(),
            alarm_code: "E1".into(),
            class: "C".into(),
            priority: Priority::P1,
        }
    }

    #[test]
    fn header_and_quoted_row() {
        let out = to_csv_string(&[sample("X, Y")]).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#""ID","Start Time","End Time","Root Cause","Alarm Code","Class","Priority""#
        );
        assert_eq!(
            lines[1],
            r#""A1","2024-05-01 08:30","2024-05-01 09:15","X, Y","E1","C","P1""#
        );
    }

    #[test]
    fn comma_field_stays_one_cell() {
        let out = to_csv_string(&[sample("X, Y")]).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 7);
        assert_eq!(&rows[0][3], "X, Y");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let out = to_csv_string(&[sample(r#"Pitch "B" fault"#)]).unwrap();
        assert!(out.contains(r#""Pitch ""B"" fault""#));
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[3], r#"Pitch "B" fault"#);
    }

    #[test]
    fn empty_set_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        assert!(matches!(
            export_to_path(&[], &path),
            Err(CoreError::NothingToExport)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        assert_eq!(export_to_path(&[sample("X")], &path).unwrap(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("\"ID\""));
    }
}
