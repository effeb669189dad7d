//! CSV store backend.
//!
//! Keeps two append-only files in the store directory:
//! - `distances.csv` with columns `target,vertex,distance`
//! - `processed.csv` with column `target`
//!
//! Opening an existing directory appends to both files, which is how an
//! interrupted job resumes.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use log::info;
use serde::{Deserialize, Serialize};

use ukr_core::record::keep_minimum;
use ukr_core::{DistanceRecord, NodeId, TargetId};

use crate::store::DistanceStore;
use crate::{OutputError, OutputResult};

pub const DISTANCES_FILE: &str = "distances.csv";
pub const PROCESSED_FILE: &str = "processed.csv";

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    target:   u32,
    vertex:   u32,
    distance: f64,
}

#[derive(Serialize, Deserialize)]
struct ProcessedRow {
    target: u32,
}

/// Writes distance records to two CSV files.
pub struct CsvStore {
    dir:       PathBuf,
    distances: Option<Writer<File>>,
    processed: Option<Writer<File>>,
}

impl CsvStore {
    /// Open (or create) the store in `dir`.  Headers are written only to
    /// new or empty files.
    pub fn open(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let distances = append_writer(&dir.join(DISTANCES_FILE), &["target", "vertex", "distance"])?;
        let processed = append_writer(&dir.join(PROCESSED_FILE), &["target"])?;
        info!("csv distance store at {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            distances: Some(distances),
            processed: Some(processed),
        })
    }

    fn flush(&mut self) -> OutputResult<()> {
        if let Some(w) = self.distances.as_mut() {
            w.flush()?;
        }
        if let Some(w) = self.processed.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}

fn append_writer(path: &Path, header: &[&str]) -> OutputResult<Writer<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let fresh = file.metadata()?.len() == 0;
    let mut w = WriterBuilder::new().has_headers(false).from_writer(file);
    if fresh {
        w.write_record(header)?;
        w.flush()?;
    }
    Ok(w)
}

impl DistanceStore for CsvStore {
    fn record(&mut self, targets: &[TargetId], records: &[DistanceRecord]) -> OutputResult<()> {
        // Appends go to the first target of the batch; the column is
        // informational, reduction ignores it.
        let owner = targets.first().map_or(u32::MAX, |t| t.0);
        let w = self.distances.as_mut().ok_or(OutputError::Closed)?;
        for r in records {
            w.serialize(StoredRecord { target: owner, vertex: r.vertex.0, distance: r.distance })?;
        }
        w.flush()?;

        let w = self.processed.as_mut().ok_or(OutputError::Closed)?;
        for t in targets {
            w.serialize(ProcessedRow { target: t.0 })?;
        }
        w.flush()?;
        Ok(())
    }

    fn processed_targets(&mut self) -> OutputResult<BTreeSet<TargetId>> {
        self.flush()?;
        let mut rdr = csv::Reader::from_path(self.dir.join(PROCESSED_FILE))?;
        let mut out = BTreeSet::new();
        for row in rdr.deserialize::<ProcessedRow>() {
            out.insert(TargetId(row?.target));
        }
        Ok(out)
    }

    fn reduce(&mut self) -> OutputResult<Vec<DistanceRecord>> {
        self.flush()?;
        let mut rdr = csv::Reader::from_path(self.dir.join(DISTANCES_FILE))?;
        let mut all = Vec::new();
        for row in rdr.deserialize::<StoredRecord>() {
            let row = row?;
            all.push(DistanceRecord::new(NodeId(row.vertex), row.distance));
        }
        Ok(keep_minimum(all))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(mut w) = self.distances.take() {
            w.flush()?;
        }
        if let Some(mut w) = self.processed.take() {
            w.flush()?;
        }
        Ok(())
    }
}
