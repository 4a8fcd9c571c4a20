//! CSV output: header row + data rows, UTF-8, no index column.

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::table::Table;

/// Write `table` to `dir/filename`, overwriting any previous file.
pub fn write_table(dir: &Path, filename: &str, table: &Table) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut writer = csv::Writer::from_path(&path).map_err(|e| ConvertError::write(&path, e))?;

    writer
        .write_record(&table.columns)
        .map_err(|e| ConvertError::write(&path, e))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| ConvertError::write(&path, e))?;
    }
    writer.flush().map_err(|e| ConvertError::write(&path, e))?;

    tracing::debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(path)
}
