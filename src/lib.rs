pub mod chart;
pub mod results;

pub use results::{load_results, BenchmarkRecord, LoadError, ResultSet};

use std::path::PathBuf;

/// Locations the report binary reads from and writes to.
///
/// Defaults match the layout the benchmark runner produces into.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// CSV written by the benchmark runner.
    pub results_path: PathBuf,
    /// Directory the chart artifacts are written into.
    pub images_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("benches/results/benchmark_results.csv"),
            images_dir: PathBuf::from("docs/images"),
        }
    }
}
