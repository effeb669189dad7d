//! SQLite store backend (feature `sqlite`).
//!
//! Creates a single `distances.db` in the store directory with two tables:
//! `distances` and `processed`.  Each `record` call is one transaction, so
//! records and their processed markers land together or not at all.

use std::collections::BTreeSet;
use std::path::Path;

use log::info;
use rusqlite::Connection;

use ukr_core::record::keep_minimum;
use ukr_core::{DistanceRecord, NodeId, TargetId};

use crate::store::DistanceStore;
use crate::OutputResult;

pub const DATABASE_FILE: &str = "distances.db";

/// Writes distance records to an SQLite database.
pub struct SqliteStore {
    conn:     Connection,
    finished: bool,
}

impl SqliteStore {
    /// Open (or create) `distances.db` in `dir` and initialise the schema.
    pub fn open(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(DATABASE_FILE))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS distances (
                 target   INTEGER NOT NULL,
                 vertex   INTEGER NOT NULL,
                 distance REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS processed (
                 target INTEGER PRIMARY KEY
             );",
        )?;
        info!("sqlite distance store at {}", dir.join(DATABASE_FILE).display());

        Ok(Self { conn, finished: false })
    }
}

impl DistanceStore for SqliteStore {
    fn record(&mut self, targets: &[TargetId], records: &[DistanceRecord]) -> OutputResult<()> {
        let owner = targets.first().map_or(i64::from(u32::MAX), |t| i64::from(t.0));
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO distances (target, vertex, distance) VALUES (?1, ?2, ?3)",
            )?;
            for r in records {
                stmt.execute(rusqlite::params![owner, r.vertex.0, r.distance])?;
            }
            let mut mark = tx.prepare_cached("INSERT OR IGNORE INTO processed (target) VALUES (?1)")?;
            for t in targets {
                mark.execute(rusqlite::params![t.0])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn processed_targets(&mut self) -> OutputResult<BTreeSet<TargetId>> {
        let mut stmt = self.conn.prepare("SELECT target FROM processed")?;
        let rows = stmt.query_map([], |row| row.get::<_, u32>(0))?;
        let mut out = BTreeSet::new();
        for t in rows {
            out.insert(TargetId(t?));
        }
        Ok(out)
    }

    fn reduce(&mut self) -> OutputResult<Vec<DistanceRecord>> {
        let mut stmt = self.conn.prepare("SELECT vertex, MIN(distance) FROM distances GROUP BY vertex")?;
        let rows = stmt.query_map([], |row| {
            Ok(DistanceRecord::new(NodeId(row.get::<_, u32>(0)?), row.get::<_, f64>(1)?))
        })?;
        let mut all = Vec::new();
        for r in rows {
            all.push(r?);
        }
        Ok(keep_minimum(all))
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
