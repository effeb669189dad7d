//! `ukr-output` — intermediate distance stores and final table writers.
//!
//! Intermediate stores implement [`DistanceStore`]:
//!
//! | Feature   | Backend       | Files created                       |
//! |-----------|---------------|-------------------------------------|
//! | *(none)*  | `MemoryStore` | none                                |
//! | *(none)*  | `CsvStore`    | `distances.csv`, `processed.csv`    |
//! | `sqlite`  | `SqliteStore` | `distances.db`                      |
//!
//! The reduced table is written with [`write_distance_table_csv`] or, with
//! feature `parquet`, `write_distance_table_parquet`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ukr_output::{CsvStore, DistanceStore};
//!
//! let mut store = CsvStore::open(Path::new("./work"))?;
//! let done = store.processed_targets()?;
//! // route everything not in `done`, calling store.record(..) per batch
//! let reduced = store.reduce()?;
//! store.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod store;
pub mod table;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvStore;
pub use error::{OutputError, OutputResult};
pub use memory::MemoryStore;
pub use row::DistanceRow;
pub use store::DistanceStore;
pub use table::{write_distance_table, write_distance_table_csv};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "parquet")]
pub use parquet::write_distance_table_parquet;
