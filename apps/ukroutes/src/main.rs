//! # ukroutes CLI
//!
//! Loads a road network and two point tables, then writes the distance from
//! every reference point to its nearest POI:
//!
//! ```text
//! ukroutes --nodes nodes.csv --edges edges.csv \
//!          --pois gps.csv --poi-id name \
//!          --references postcodes.csv --reference-id postcode \
//!          --output distances.csv
//! ```
//!
//! Intermediate results go to `--work-dir`; rerunning with the same
//! directory resumes a job that was killed part way through.

mod progress;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};

use ukr_core::{RoutingConfig, Strategy, WeightColumn};
use ukr_graph::tables::{read_edges_csv, read_nodes_csv, read_points_csv};
use ukr_graph::GraphBuilder;
use ukr_job::{JobOutput, RoutingJobBuilder};
use ukr_output::{write_distance_table_csv, CsvStore, DistanceStore, MemoryStore};

use progress::ProgressObserver;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// Keep records in memory; nothing to resume from.
    Memory,
    /// `distances.csv` + `processed.csv` in the work directory.
    Csv,
    /// `distances.db` in the work directory.
    Sqlite,
}

/// Nearest-POI distances over a road network.
#[derive(Parser)]
#[command(name = "ukroutes", version)]
struct Cli {
    /// Node table: node_id, easting, northing
    #[arg(long)]
    nodes: PathBuf,

    /// Edge table: start_node, end_node, length [, time_weighted, pedestrian_time]
    #[arg(long)]
    edges: PathBuf,

    /// POI table with easting, northing and an identifier column
    #[arg(long)]
    pois: PathBuf,

    #[arg(long, default_value = "name")]
    poi_id: String,

    /// Reference-point table with easting, northing and an identifier column
    #[arg(long)]
    references: PathBuf,

    #[arg(long, default_value = "postcode")]
    reference_id: String,

    /// JSON routing configuration; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Weight column: length | time_weighted | pedestrian_time
    #[arg(long)]
    weights: Option<WeightColumn>,

    /// Nearest nodes each point is attached to
    #[arg(long)]
    k: Option<usize>,

    /// Candidate POIs per reference point for buffer hints
    #[arg(long)]
    topk: Option<usize>,

    /// Starting search radius (m)
    #[arg(long)]
    min_buffer: Option<f64>,

    /// Largest search radius before fallback (m)
    #[arg(long)]
    max_buffer: Option<f64>,

    /// Do not explore paths longer than this (weight units)
    #[arg(long)]
    cutoff: Option<f64>,

    /// per-source | multi-source-batch
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Skip POIs whose buffer hits the maximum instead of routing them on
    /// the full graph
    #[arg(long)]
    no_fallback: bool,

    /// POIs per multi-source search
    #[arg(long)]
    batch_size: Option<usize>,

    /// Worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Drop nodes outside the largest connected component before attaching
    #[arg(long)]
    largest_component: bool,

    #[arg(long, value_enum, default_value_t = StoreKind::Csv)]
    store: StoreKind,

    /// Directory for intermediate results
    #[arg(long, default_value = "ukroutes-work")]
    work_dir: PathBuf,

    /// Final table; `.parquet` needs the `parquet` feature
    #[arg(short, long, default_value = "distances.csv")]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn routing_config(&self) -> Result<RoutingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => RoutingConfig::default(),
        };

        if let Some(w) = self.weights {
            config.weights = w;
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(t) = self.topk {
            config.topk = t;
        }
        if let Some(b) = self.min_buffer {
            config.min_buffer = b;
        }
        if let Some(b) = self.max_buffer {
            config.max_buffer = b;
        }
        if self.cutoff.is_some() {
            config.cutoff = self.cutoff;
        }
        if let Some(s) = self.strategy {
            config.strategy = s;
        }
        if self.no_fallback {
            config.fallback = false;
        }
        if self.batch_size.is_some() {
            config.batch_size = self.batch_size;
        }
        if self.threads.is_some() {
            config.num_threads = self.threads;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = cli.routing_config()?;
    info!("configuration: {config:?}");

    let nodes = read_nodes_csv(&cli.nodes).with_context(|| format!("reading {}", cli.nodes.display()))?;
    let edges = read_edges_csv(&cli.edges).with_context(|| format!("reading {}", cli.edges.display()))?;
    let network = GraphBuilder::from_tables(&nodes, &edges)?;
    info!("loaded {} nodes and {} edges", network.node_count(), network.edge_count());

    let pois = read_points_csv(&cli.pois, &cli.poi_id)
        .with_context(|| format!("reading {}", cli.pois.display()))?;
    let references = read_points_csv(&cli.references, &cli.reference_id)
        .with_context(|| format!("reading {}", cli.references.display()))?;

    let job = RoutingJobBuilder::new(config, network)
        .pois(pois)
        .reference_points(references)
        .largest_component(cli.largest_component)
        .build()?;

    let mut store = open_store(cli.store, &cli.work_dir)?;
    let out = job.run(&mut store, &mut ProgressObserver::new())?;
    finish(&cli, &out)
}

fn open_store(kind: StoreKind, dir: &Path) -> Result<Box<dyn DistanceStore>> {
    Ok(match kind {
        StoreKind::Memory => Box::new(MemoryStore::new()),
        StoreKind::Csv => Box::new(CsvStore::open(dir)?),
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => Box::new(ukr_output::SqliteStore::open(dir)?),
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => bail!("built without the `sqlite` feature"),
    })
}

fn finish(cli: &Cli, out: &JobOutput) -> Result<()> {
    let is_parquet = cli.output.extension().is_some_and(|e| e == "parquet");
    if is_parquet {
        #[cfg(feature = "parquet")]
        ukr_output::write_distance_table_parquet(&cli.output, &cli.reference_id, &out.rows)?;
        #[cfg(not(feature = "parquet"))]
        bail!("{} needs the `parquet` feature", cli.output.display());
    } else {
        write_distance_table_csv(&cli.output, &cli.reference_id, &out.rows)?;
    }
    info!("wrote {} rows to {}", out.rows.len(), cli.output.display());
    Ok(())
}
