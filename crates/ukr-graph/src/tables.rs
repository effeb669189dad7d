//! Flat input tables and their CSV loaders.
//!
//! # CSV formats
//!
//! ```csv
//! node_id,easting,northing
//! 1001,530000.0,180000.0
//! ```
//!
//! ```csv
//! start_node,end_node,length,time_weighted,pedestrian_time
//! 1001,1002,120.5,0.28,1.45
//! ```
//!
//! `time_weighted` and `pedestrian_time` are optional; missing columns (or
//! empty cells) are derived from `length` when the graph is built.
//!
//! Point tables need `easting`, `northing`, and one identifier column whose
//! name is supplied by the caller (`postcode`, `name`, …).  Empty or
//! unparseable coordinates load as NaN so the attacher can drop and count
//! them instead of failing the whole file.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ukr_core::Coord;

use crate::{GraphError, GraphResult};

// ── Rows ──────────────────────────────────────────────────────────────────────

/// One row of the external `nodes` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NodeRow {
    pub node_id:  i64,
    pub easting:  f64,
    pub northing: f64,
}

/// One row of the external `edges` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EdgeRow {
    pub start_node: i64,
    pub end_node:   i64,
    pub length:     f64,
    #[serde(default)]
    pub time_weighted: Option<f64>,
    #[serde(default)]
    pub pedestrian_time: Option<f64>,
}

impl EdgeRow {
    /// An edge carrying only `length`; both time columns are derived.
    pub fn from_length(start_node: i64, end_node: i64, length: f64) -> Self {
        Self { start_node, end_node, length, time_weighted: None, pedestrian_time: None }
    }
}

/// A point to be attached: a POI or a reference point.
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    /// Domain identifier carried through to the output (postcode, name, …).
    pub identifier: String,
    pub coord:      Coord,
}

impl PointRecord {
    pub fn new(identifier: impl Into<String>, easting: f64, northing: f64) -> Self {
        Self { identifier: identifier.into(), coord: Coord::new(easting, northing) }
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

pub fn read_nodes_csv(path: &Path) -> GraphResult<Vec<NodeRow>> {
    read_nodes(std::fs::File::open(path)?)
}

/// Like [`read_nodes_csv`] but accepts any `Read` source.
pub fn read_nodes<R: Read>(reader: R) -> GraphResult<Vec<NodeRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<NodeRow>()
        .map(|r| r.map_err(GraphError::from))
        .collect()
}

pub fn read_edges_csv(path: &Path) -> GraphResult<Vec<EdgeRow>> {
    read_edges(std::fs::File::open(path)?)
}

/// Like [`read_edges_csv`] but accepts any `Read` source.
pub fn read_edges<R: Read>(reader: R) -> GraphResult<Vec<EdgeRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    rdr.deserialize::<EdgeRow>()
        .map(|r| r.map_err(GraphError::from))
        .collect()
}

pub fn read_points_csv(path: &Path, id_column: &str) -> GraphResult<Vec<PointRecord>> {
    read_points(std::fs::File::open(path)?, id_column)
}

/// Load a point table, keeping `id_column` as the identifier.
///
/// Missing `easting`/`northing`/`id_column` headers are a hard error; bad
/// coordinate cells are not (see module docs).
pub fn read_points<R: Read>(reader: R, id_column: &str) -> GraphResult<Vec<PointRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| GraphError::MalformedInput(format!("point table has no {name:?} column")))
    };
    let id_idx = column(id_column)?;
    let e_idx  = column("easting")?;
    let n_idx  = column("northing")?;

    let parse = |cell: Option<&str>| {
        cell.and_then(|c| c.trim().parse::<f64>().ok()).unwrap_or(f64::NAN)
    };

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        points.push(PointRecord {
            identifier: record.get(id_idx).unwrap_or_default().to_owned(),
            coord:      Coord::new(parse(record.get(e_idx)), parse(record.get(n_idx))),
        });
    }
    Ok(points)
}
