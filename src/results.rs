use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced while loading the benchmark results file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(
        "results file not found: {}\nRun benchmarks first: cargo run --release --example bench_runner",
        .path.display()
    )]
    MissingInput { path: PathBuf },

    #[error("malformed benchmark results: {0}")]
    Parse(#[from] csv::Error),
}

/// One measured row from the benchmark results CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Number of browser windows open during the run
    pub windows: u32,
    /// Length of the sustained-operations phase in seconds
    pub duration_secs: u32,
    /// Time to spawn the windows, in milliseconds
    pub spawn_time_ms: f64,
    /// Total operations completed during the run
    pub total_ops: u64,
    /// Sustained throughput
    pub ops_per_sec: f64,
    /// Operations that failed during the run
    pub errors: u64,
}

/// Benchmark records in file order, with the grouped views the charts need.
///
/// The source CSV may contain duplicate (windows, duration_secs) pairs;
/// every query here resolves duplicates by taking the first record in
/// load order and silently ignoring the rest.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Vec<BenchmarkRecord>,
}

impl ResultSet {
    pub fn new(records: Vec<BenchmarkRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct window counts, ascending.
    pub fn window_counts(&self) -> Vec<u32> {
        self.records
            .iter()
            .map(|r| r.windows)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct test durations, ascending.
    pub fn durations(&self) -> Vec<u32> {
        self.records
            .iter()
            .map(|r| r.duration_secs)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Spawn time per distinct window count, ascending by window count.
    pub fn spawn_times(&self) -> Vec<(u32, f64)> {
        let mut by_count = BTreeMap::new();
        for record in &self.records {
            by_count.entry(record.windows).or_insert(record.spawn_time_ms);
        }
        by_count.into_iter().collect()
    }

    /// Throughput for a (windows, duration) combination, or 0.0 when no
    /// record matches.
    pub fn ops_per_sec(&self, windows: u32, duration_secs: u32) -> f64 {
        self.records
            .iter()
            .find(|r| r.windows == windows && r.duration_secs == duration_secs)
            .map(|r| r.ops_per_sec)
            .unwrap_or(0.0)
    }
}

/// Load benchmark results from a CSV with a header row.
///
/// Rows are kept exactly as read: no deduplication, filtering, or sorting.
/// Any row that fails to coerce to the record schema aborts the load.
pub fn load_results(path: &Path) -> Result<ResultSet, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }

    Ok(ResultSet::new(records))
}
