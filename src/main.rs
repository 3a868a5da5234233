use anyhow::Result;
use bench_report::chart::{ensure_fonts_available, generate_charts};
use bench_report::{load_results, ReportConfig};

fn main() -> Result<()> {
    let config = ReportConfig::default();

    // Fail before touching any files if the render stack can't draw text.
    ensure_fonts_available()?;

    println!("Loading benchmark results...");
    let results = load_results(&config.results_path)?;
    println!("  Found {} data points", results.len());

    println!("\nGenerating charts...");
    generate_charts(&results, &config.images_dir)?;

    println!("\nDone!");
    Ok(())
}
