//! CSV export of the full history.

use crate::{history, Result, Store};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    user: &'a str,
    date: &'a str,
    bmi: f64,
    category: &'static str,
}

/// Write every record as `user,date,bmi,category`, replacing `csv_path`
///
/// Returns the number of rows written. The header is always written, even
/// for an empty store.
pub fn write_csv(store: &Store, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_path)?;
    writer.write_record(["user", "date", "bmi", "category"])?;

    let rows = history::rows(store);
    for row in &rows {
        writer.serialize(CsvRow {
            user: row.user,
            date: row.date,
            bmi: row.bmi,
            category: row.category().as_str(),
        })?;
    }

    writer.flush()?;
    tracing::info!("Exported {} records to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}
