use crate::results::ResultSet;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

// Font sizes
const TITLE_FONT_SIZE: u32 = 44;
const AXIS_LABEL_FONT_SIZE: u32 = 26;
const TICK_LABEL_FONT_SIZE: u32 = 20;
const LEGEND_FONT_SIZE: u32 = 20;
const DATA_LABEL_FONT_SIZE: u32 = 16;

// Pixel dimensions match the original report images (10x6 and 12x7 inches
// at 150 DPI).
const SPAWN_CHART_SIZE: (u32, u32) = (1500, 900);
const OPS_CHART_SIZE: (u32, u32) = (1800, 1050);

const SPAWN_BAR_COLOR: RGBColor = RGBColor(76, 175, 80);

/// Colors for per-window-count series, cycled when there are more series
/// than palette entries.
const SERIES_COLORS: &[RGBColor] = &[
    RGBColor(33, 150, 243), // Blue
    RGBColor(255, 152, 0),  // Orange
    RGBColor(76, 175, 80),  // Green
    RGBColor(233, 30, 99),  // Pink
];

/// Check that the render stack can measure text, before any file I/O.
///
/// The bitmap backend resolves "sans-serif" through the system font
/// registry at draw time; on a machine with no fonts installed every chart
/// would otherwise fail halfway through rendering.
pub fn ensure_fonts_available() -> Result<()> {
    let font = ("sans-serif", TICK_LABEL_FONT_SIZE as f64).into_font();
    font.box_size("0").map_err(|e| {
        anyhow::anyhow!(
            "no usable sans-serif font for chart rendering: {}\n\
             Install a system font package (e.g. fontconfig with DejaVu or Liberation fonts)",
            e
        )
    })?;
    Ok(())
}

/// Generate both benchmark charts into `images_dir`.
pub fn generate_charts(results: &ResultSet, images_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(images_dir).context("Failed to create images directory")?;

    generate_spawn_chart(results, images_dir)?;
    generate_ops_chart(results, images_dir)?;

    Ok(())
}

/// Bar chart of window spawn time by window count.
fn generate_spawn_chart(results: &ResultSet, images_dir: &Path) -> Result<()> {
    let path = images_dir.join("benchmark_spawn.png");
    let root = BitMapBackend::new(&path, SPAWN_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let spawn_times = results.spawn_times();
    let windows: Vec<u32> = spawn_times.iter().map(|&(w, _)| w).collect();
    let num_counts = spawn_times.len().max(1);

    let max_time = spawn_times
        .iter()
        .map(|&(_, t)| t)
        .fold(0.0_f64, |a, b| a.max(b))
        * 1.15;

    let mut chart = ChartBuilder::on(&root)
        .caption("Window Spawn Performance", ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..(num_counts as f64 - 0.5), 0.0..max_time.max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_counts)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < num_counts && (x - idx as f64).abs() < 0.3 {
                windows.get(idx).map(|w| w.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_desc("Spawn Time (ms)")
        .x_desc("Number of Windows")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let bar_width = 0.6;

    for (idx, &(_, time)) in spawn_times.iter().enumerate() {
        let x_center = idx as f64;
        let x_left = x_center - bar_width / 2.0;
        let x_right = x_center + bar_width / 2.0;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x_left, 0.0), (x_right, time)],
            SPAWN_BAR_COLOR.filled(),
        )))?;

        // Value label on top of bar
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.0}ms", time),
            (x_center, time + max_time * 0.02),
            ("sans-serif", DATA_LABEL_FONT_SIZE + 2)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        )))?;
    }

    root.present()?;
    println!("Generated: {}", path.display());
    Ok(())
}

/// Grouped bar chart of throughput by test duration, one series per
/// window count.
fn generate_ops_chart(results: &ResultSet, images_dir: &Path) -> Result<()> {
    let path = images_dir.join("benchmark_ops.png");
    let root = BitMapBackend::new(&path, OPS_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let window_counts = results.window_counts();
    let durations = results.durations();
    let num_durations = durations.len().max(1);
    let num_series = window_counts.len();

    let max_ops = results
        .records()
        .iter()
        .map(|r| r.ops_per_sec)
        .fold(0.0_f64, |a, b| a.max(b))
        * 1.2;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Sustained Operations Performance",
            ("sans-serif", TITLE_FONT_SIZE),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(110)
        .build_cartesian_2d(-0.5..(num_durations as f64 - 0.5), 0.0..max_ops.max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_durations)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < num_durations && (x - idx as f64).abs() < 0.3 {
                durations
                    .get(idx)
                    .map(|d| format!("{}s", d))
                    .unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_labels(8)
        .y_label_formatter(&|y| format_thousands(*y))
        .y_desc("Operations per Second")
        .x_desc("Test Duration (seconds)")
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let bar_width = 0.2;

    for (series_idx, &wc) in window_counts.iter().enumerate() {
        let color = SERIES_COLORS[series_idx % SERIES_COLORS.len()];

        for (dur_idx, &duration) in durations.iter().enumerate() {
            let ops = results.ops_per_sec(wc, duration);

            let x_center = dur_idx as f64;
            let x_offset = (series_idx as f64 - num_series as f64 / 2.0 + 0.5) * bar_width;
            let x_left = x_center + x_offset - bar_width / 2.0 + 0.02;
            let x_right = x_center + x_offset + bar_width / 2.0 - 0.02;
            let x_mid = (x_left + x_right) / 2.0;

            // A missing combination still gets its (zero-height) bar; only
            // the label is suppressed.
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x_left, 0.0), (x_right, ops)],
                color.filled(),
            )))?;

            if ops > 0.0 {
                chart.draw_series(std::iter::once(Text::new(
                    format!("{:.0}", ops),
                    (x_mid, ops + max_ops * 0.01),
                    ("sans-serif", DATA_LABEL_FONT_SIZE)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Bottom)),
                )))?;
            }
        }

        chart
            .draw_series(std::iter::once(Circle::new(
                (num_durations as f64 - 1.0, max_ops),
                0,
                color.filled(),
            )))?
            .label(format!("{} windows", wc))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }

    if num_series > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LEGEND_FONT_SIZE))
            .draw()?;
    }

    root.present()?;
    println!("Generated: {}", path.display());
    Ok(())
}

/// Format a tick value with thousands separators ("12,345").
fn format_thousands(value: f64) -> String {
    let v = value.round() as i64;
    let digits = v.abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    if v < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{BenchmarkRecord, ResultSet};
    use tempfile::tempdir;

    fn record(
        windows: u32,
        duration_secs: u32,
        spawn_time_ms: f64,
        ops_per_sec: f64,
    ) -> BenchmarkRecord {
        BenchmarkRecord {
            windows,
            duration_secs,
            spawn_time_ms,
            total_ops: (ops_per_sec * duration_secs as f64) as u64,
            ops_per_sec,
            errors: 0,
        }
    }

    fn sample_results() -> ResultSet {
        // No (4, 30) row: that combination plots as a zero-height bar.
        ResultSet::new(vec![
            record(2, 10, 143.0, 5231.0),
            record(4, 10, 812.0, 4012.0),
            record(2, 30, 143.0, 5102.0),
        ])
    }

    #[test]
    fn test_generate_charts_creates_output_directory() {
        let dir = tempdir().unwrap();
        let images_dir = dir.path().join("docs").join("images");

        generate_charts(&sample_results(), &images_dir).unwrap();

        let spawn_path = images_dir.join("benchmark_spawn.png");
        let ops_path = images_dir.join("benchmark_ops.png");
        assert!(spawn_path.is_file());
        assert!(ops_path.is_file());
        assert!(std::fs::metadata(&spawn_path).unwrap().len() > 0);
        assert!(std::fs::metadata(&ops_path).unwrap().len() > 0);
    }

    #[test]
    fn test_generate_charts_deterministic() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");

        generate_charts(&sample_results(), &first).unwrap();
        generate_charts(&sample_results(), &second).unwrap();

        for name in ["benchmark_spawn.png", "benchmark_ops.png"] {
            let a = std::fs::read(first.join(name)).unwrap();
            let b = std::fs::read(second.join(name)).unwrap();
            assert_eq!(a, b, "{} differs between runs", name);
        }
    }

    #[test]
    fn test_generate_charts_overwrites_existing_artifacts() {
        let dir = tempdir().unwrap();
        let images_dir = dir.path().to_path_buf();

        let spawn_path = images_dir.join("benchmark_spawn.png");
        std::fs::write(&spawn_path, b"stale").unwrap();

        generate_charts(&sample_results(), &images_dir).unwrap();

        assert_ne!(std::fs::read(&spawn_path).unwrap(), b"stale");
    }

    #[test]
    fn test_generate_charts_empty_results() {
        let dir = tempdir().unwrap();
        let results = ResultSet::new(Vec::new());

        generate_charts(&results, dir.path()).unwrap();

        assert!(dir.path().join("benchmark_spawn.png").is_file());
        assert!(dir.path().join("benchmark_ops.png").is_file());
    }

    #[test]
    fn test_generate_charts_duplicate_window_counts() {
        let dir = tempdir().unwrap();
        // Duplicate windows=2 rows render as a single spawn bar.
        let results = ResultSet::new(vec![
            record(2, 10, 100.0, 500.0),
            record(2, 20, 999.0, 400.0),
            record(4, 10, 200.0, 700.0),
        ]);

        generate_charts(&results, dir.path()).unwrap();
    }

    #[test]
    fn test_ensure_fonts_available() {
        ensure_fonts_available().unwrap();
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(-45678.0), "-45,678");
    }

    #[test]
    fn test_format_thousands_rounds() {
        assert_eq!(format_thousands(5231.4), "5,231");
        assert_eq!(format_thousands(5231.6), "5,232");
    }
}
