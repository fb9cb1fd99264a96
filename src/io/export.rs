//! Export the merged series to CSV.
//!
//! One row per date; each category gets an observed and a predicted column.
//! Absent values are empty cells, so spreadsheets see them as blanks.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Category, MergedSeries, Value};
use crate::error::AppError;

/// Write `merged` to a CSV file.
pub fn write_merged_csv(path: &Path, merged: &MergedSeries) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "{}", header())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for entry in merged.entries() {
        let mut cells = vec![entry.date.to_string()];
        for category in Category::ALL {
            cells.push(cell(entry.observed[category]));
            cells.push(cell(entry.predicted[category]));
        }
        writeln!(file, "{}", cells.join(","))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn header() -> String {
    let mut columns = vec!["date".to_string()];
    for category in Category::ALL {
        columns.push(format!("{}_observed", category.key()));
        columns.push(format!("{}_predicted", category.key()));
    }
    columns.join(",")
}

fn cell(v: Value) -> String {
    v.map(|x| format!("{x:.1}")).unwrap_or_default()
}
