//! Final distance table as Parquet (feature `parquet`).

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::{DistanceRow, OutputResult};

fn table_schema(id_column: &str) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new(id_column,  DataType::Utf8,    false),
        Field::new("distance", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Write `rows` to `path` as a single-row-group Parquet file.
pub fn write_distance_table_parquet(path: &Path, id_column: &str, rows: &[DistanceRow]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let schema = table_schema(id_column);

    let mut ids       = StringBuilder::new();
    let mut distances = Float64Builder::new();
    for row in rows {
        ids.append_value(&row.identifier);
        distances.append_value(row.distance);
    }

    let batch = RecordBatch::try_new(
        Arc::clone(&schema),
        vec![Arc::new(ids.finish()), Arc::new(distances.finish())],
    )?;

    let mut writer = ArrowWriter::try_new(File::create(path)?, schema, Some(snappy_props()))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
