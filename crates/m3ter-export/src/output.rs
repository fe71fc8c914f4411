//! CSV output.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// A report row with a fixed column order.
pub trait CsvRecord: Serialize {
    /// Column headers, in the order the fields serialize.
    const HEADERS: &'static [&'static str];
}

/// Write records to `path`, replacing any existing file.
///
/// The header row is always written, so an empty report is a header-only
/// file. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or a record
/// cannot be serialized.
pub fn write_csv<T: CsvRecord>(path: &Path, records: &[T]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(T::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote CSV");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::NetsuiteCode;
    use crate::report::{DailyRecord, MonthlyRecord};

    fn monthly(code: NetsuiteCode, subsidiary: Option<i64>) -> MonthlyRecord {
        MonthlyRecord {
            subsidiary_id: subsidiary,
            sf_account_id: Some("SF-1".into()),
            netsuite_product_code: code,
            quantity: Some(12.0),
            date: Some("2024-03-14".into()),
        }
    }

    #[test]
    fn monthly_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("dataExfiltration.csv");

        let written = write_csv(
            &path,
            &[
                monthly(NetsuiteCode::Id(555), Some(100)),
                monthly(NetsuiteCode::NotAvailable, None),
            ],
        )
        .unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], "Subsidiary ID,SF Account ID,Netsuite Product Code,Quantity,Date");
        assert_eq!(lines[1], "100,SF-1,555,12.0,2024-03-14");
        assert_eq!(lines[2], ",SF-1,N/A,12.0,2024-03-14");
    }

    #[test]
    fn daily_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily.csv");

        write_csv(
            &path,
            &[DailyRecord {
                subsidiary_id: Some(200),
                sf_account_id: Some("SF-2".into()),
                netsuite_product_code: 777,
                price: 0.25,
                quantity: Some(4.0),
                date: Some("2024-03-14".into()),
            }],
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Subsidiary ID,SF Account ID,Netsuite Product Code,Price,Quantity,Date\n\
             200,SF-2,777,0.25,4.0,2024-03-14\n"
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv::<MonthlyRecord>(&path, &[]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn existing_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let old = "old contents that are much longer than the new file\n".repeat(10);
        std::fs::write(&path, old).unwrap();

        write_csv::<MonthlyRecord>(&path, &[]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("old contents"));
    }
}
