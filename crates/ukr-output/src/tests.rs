//! Tests for ukr-output stores and table writers.

#[cfg(test)]
mod helpers {
    use ukr_core::{DistanceRecord, NodeId, TargetId};

    use crate::store::DistanceStore;

    pub fn rec(vertex: u32, distance: f64) -> DistanceRecord {
        DistanceRecord::new(NodeId(vertex), distance)
    }

    /// Three targets that reach overlapping reference vertices.
    pub fn fill<S: DistanceStore>(store: &mut S) {
        store.record(&[TargetId(0)], &[rec(10, 5.0), rec(11, 9.0)]).unwrap();
        store.record(&[TargetId(1)], &[rec(10, 3.5), rec(12, 1.0)]).unwrap();
        store.record(&[TargetId(2)], &[]).unwrap();
    }

    /// Contract every backend must satisfy after [`fill`].
    pub fn check_filled<S: DistanceStore>(store: &mut S) {
        let done: Vec<u32> = store.processed_targets().unwrap().into_iter().map(|t| t.0).collect();
        assert_eq!(done, [0, 1, 2]);

        let reduced = store.reduce().unwrap();
        assert_eq!(reduced, vec![rec(12, 1.0), rec(10, 3.5), rec(11, 9.0)]);
        assert_eq!(store.reduce().unwrap(), reduced, "reduce must be idempotent");
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod memory_tests {
    use ukr_core::TargetId;

    use super::helpers::{check_filled, fill, rec};
    use crate::store::DistanceStore;
    use crate::MemoryStore;

    #[test]
    fn memory_contract() {
        let mut s = MemoryStore::new();
        fill(&mut s);
        check_filled(&mut s);
        s.finish().unwrap();
        s.finish().unwrap();
    }

    #[test]
    fn records_are_appended_not_overwritten() {
        let mut s = MemoryStore::new();
        s.record(&[TargetId(0)], &[rec(1, 4.0)]).unwrap();
        s.record(&[TargetId(0)], &[rec(1, 2.0)]).unwrap();
        assert_eq!(s.records().len(), 2);
        assert_eq!(s.reduce().unwrap(), vec![rec(1, 2.0)]);
        assert_eq!(s.processed_targets().unwrap().len(), 1);
    }

    #[test]
    fn batch_marks_every_target() {
        let mut s = MemoryStore::new();
        s.record(&[TargetId(4), TargetId(7)], &[rec(1, 1.0)]).unwrap();
        let done = s.processed_targets().unwrap();
        assert!(done.contains(&TargetId(4)) && done.contains(&TargetId(7)));
    }

    #[test]
    fn boxed_store_forwards() {
        let mut s: Box<dyn DistanceStore> = Box::new(MemoryStore::new());
        fill(&mut s);
        check_filled(&mut s);
    }
}

// ── CsvStore ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use ukr_core::TargetId;

    use super::helpers::{check_filled, fill, rec};
    use crate::csv::{DISTANCES_FILE, PROCESSED_FILE};
    use crate::store::DistanceStore;
    use crate::{CsvStore, OutputError};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut s = CsvStore::open(dir.path()).unwrap();
        s.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(DISTANCES_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["target", "vertex", "distance"]);
        assert!(dir.path().join(PROCESSED_FILE).exists());
    }

    #[test]
    fn csv_contract() {
        let dir = tmp();
        let mut s = CsvStore::open(dir.path()).unwrap();
        fill(&mut s);
        check_filled(&mut s);
    }

    #[test]
    fn reopen_appends_and_resumes() {
        let dir = tmp();
        {
            let mut s = CsvStore::open(dir.path()).unwrap();
            s.record(&[TargetId(0)], &[rec(10, 5.0)]).unwrap();
            s.finish().unwrap();
        }

        let mut s = CsvStore::open(dir.path()).unwrap();
        let done = s.processed_targets().unwrap();
        assert_eq!(done.into_iter().collect::<Vec<_>>(), [TargetId(0)]);

        s.record(&[TargetId(1)], &[rec(10, 2.0), rec(11, 4.0)]).unwrap();
        assert_eq!(s.reduce().unwrap(), vec![rec(10, 2.0), rec(11, 4.0)]);

        // Header written once only.
        let text = std::fs::read_to_string(dir.path().join(DISTANCES_FILE)).unwrap();
        assert_eq!(text.matches("target,vertex,distance").count(), 1);
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn record_after_finish_fails() {
        let dir = tmp();
        let mut s = CsvStore::open(dir.path()).unwrap();
        s.finish().unwrap();
        s.finish().unwrap();
        assert!(matches!(s.record(&[TargetId(0)], &[]), Err(OutputError::Closed)));
    }
}

// ── Table writers ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod table_tests {
    use crate::{write_distance_table, write_distance_table_csv, DistanceRow};

    fn rows() -> Vec<DistanceRow> {
        vec![
            DistanceRow { identifier: "AB1 0AA".into(), distance: 1.5 },
            DistanceRow { identifier: "AB1 0AB".into(), distance: 27.25 },
        ]
    }

    #[test]
    fn csv_table_uses_identifier_column_name() {
        let mut buf = Vec::new();
        write_distance_table(&mut buf, "postcode", &rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "postcode,distance\nAB1 0AA,1.5\nAB1 0AB,27.25\n");
    }

    #[test]
    fn csv_table_file_reads_back() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out").join("distances.csv");
        write_distance_table_csv(&path, "name", &rows()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let back: Vec<DistanceRow> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                DistanceRow { identifier: r[0].to_owned(), distance: r[1].parse().unwrap() }
            })
            .collect();
        assert_eq!(back, rows());
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use ukr_core::TargetId;

    use super::helpers::{check_filled, fill, rec};
    use crate::sqlite::{SqliteStore, DATABASE_FILE};
    use crate::store::DistanceStore;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _s = SqliteStore::open(dir.path()).unwrap();
        assert!(dir.path().join(DATABASE_FILE).exists());
    }

    #[test]
    fn sqlite_contract() {
        let dir = tmp();
        let mut s = SqliteStore::open(dir.path()).unwrap();
        fill(&mut s);
        check_filled(&mut s);
        s.finish().unwrap();
        s.finish().unwrap();
    }

    #[test]
    fn sqlite_rows_appended() {
        let dir = tmp();
        let mut s = SqliteStore::open(dir.path()).unwrap();
        s.record(&[TargetId(0)], &[rec(1, 3.0), rec(2, 4.0)]).unwrap();
        s.record(&[TargetId(1)], &[rec(1, 2.0)]).unwrap();
        s.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join(DATABASE_FILE)).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM distances", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_reopen_resumes() {
        let dir = tmp();
        {
            let mut s = SqliteStore::open(dir.path()).unwrap();
            s.record(&[TargetId(3)], &[rec(1, 3.0)]).unwrap();
            s.finish().unwrap();
        }
        let mut s = SqliteStore::open(dir.path()).unwrap();
        assert!(s.processed_targets().unwrap().contains(&TargetId(3)));
        s.record(&[TargetId(3)], &[rec(1, 1.0)]).unwrap();
        assert_eq!(s.reduce().unwrap(), vec![rec(1, 1.0)]);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use arrow::array::{Array, Float64Array, StringArray};
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::write_distance_table_parquet;
    use crate::DistanceRow;

    #[test]
    fn parquet_table_round_trip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("distances.parquet");
        let rows = vec![
            DistanceRow { identifier: "a".into(), distance: 1.0 },
            DistanceRow { identifier: "b".into(), distance: 2.5 },
        ];
        write_distance_table_parquet(&path, "postcode", &rows).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["postcode", "distance"]);
        assert_eq!(*schema.field_with_name("distance").unwrap().data_type(), DataType::Float64);

        let batches: Vec<_> = builder.build().unwrap().map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 1);
        let ids = batches[0].column(0).as_any().downcast_ref::<StringArray>().unwrap();
        let dist = batches[0].column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.value(1), "b");
        assert_eq!(dist.value(1), 2.5);
    }
}
