//! Final distance table as CSV.

use std::io::Write;
use std::path::Path;

use crate::{DistanceRow, OutputResult};

/// Write `rows` to `path` with columns `<id_column>,distance`.
pub fn write_distance_table_csv(path: &Path, id_column: &str, rows: &[DistanceRow]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_distance_table(std::fs::File::create(path)?, id_column, rows)
}

/// Like [`write_distance_table_csv`] for any writer.
pub fn write_distance_table<W: Write>(writer: W, id_column: &str, rows: &[DistanceRow]) -> OutputResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([id_column, "distance"])?;
    for row in rows {
        w.write_record([row.identifier.as_str(), &row.distance.to_string()])?;
    }
    w.flush()?;
    Ok(())
}
