//! Chart artifact rendering with plotters.
//!
//! Three artifacts: a categorical bar chart and a pie chart of the fixed
//! condition table, plus an age histogram over fixed decade buckets. A
//! failed artifact is reported and the remaining ones are still attempted.

use crate::models::{AnalysisResult, Column, PatientTable};
use crate::report::{View, BAR_CHART_FILE, PIE_CHART_FILE};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Histogram bucket edges; values outside the range are not drawn.
pub const AGE_BUCKET_EDGES: [u32; 6] = [20, 30, 40, 50, 60, 70];

/// Fixed pie palette, cycled/truncated to the number of categories.
const PIE_PALETTE: [RGBColor; 5] = [
    RGBColor(173, 216, 230), // light blue
    RGBColor(144, 238, 144), // light green
    RGBColor(240, 128, 128), // light coral
    RGBColor(255, 160, 122), // light salmon
    RGBColor(221, 160, 221), // plum
];

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235); // sky blue
const HIST_COLOR: RGBColor = RGBColor(240, 128, 128); // light coral

/// Where and how large chart artifacts are rendered.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Render all chart artifacts for the given view.
///
/// No-op (with a diagnostic) when there is no condition data. The histogram
/// is only emitted when the table has an age column with at least one
/// present value. Returns the paths actually written; individual failures
/// are logged and do not stop the remaining artifacts.
pub fn render_charts(
    analysis: &AnalysisResult,
    table: &PatientTable,
    view: View,
    options: &ChartOptions,
) -> Vec<PathBuf> {
    if analysis.condition_counts.is_empty() {
        warn!("No condition data to visualize");
        return Vec::new();
    }

    let mut written = Vec::new();

    let bar_path = options.output_dir.join(BAR_CHART_FILE);
    match render_bar_chart(analysis, &bar_path, options) {
        Ok(()) => written.push(bar_path),
        Err(e) => warn!("Failed to render bar chart: {:#}", e),
    }

    let pie_path = options.output_dir.join(PIE_CHART_FILE);
    match render_pie_chart(analysis, &pie_path, options) {
        Ok(()) => written.push(pie_path),
        Err(e) => warn!("Failed to render pie chart: {:#}", e),
    }

    if table.has_column(Column::Age) && !table.present_ages().is_empty() {
        let hist_path = options.output_dir.join(view.histogram_file());
        match render_age_histogram(table, view, &hist_path, options) {
            Ok(()) => written.push(hist_path),
            Err(e) => warn!("Failed to render age histogram: {:#}", e),
        }
    } else {
        debug!("Skipping age histogram: no present ages");
    }

    written
}

/// Categorical bar chart of condition prevalence.
fn render_bar_chart(analysis: &AnalysisResult, path: &Path, options: &ChartOptions) -> Result<()> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = analysis.condition_counts.iter().map(|&(n, _)| n).collect();
    let max_count = analysis
        .condition_counts
        .iter()
        .map(|&(_, c)| c)
        .max()
        .unwrap_or(0);

    let mut chart = ChartBuilder::on(&root)
        .caption("Prevalence of Conditions in EMR Data", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..names.len()).into_segmented(), 0u32..max_count + 1)?;

    chart
        .configure_mesh()
        .x_desc("Conditions")
        .y_desc("Number of Patients")
        .x_label_formatter(&|coord| match coord {
            SegmentValue::CenterOf(i) => names.get(*i).map(|n| n.to_string()).unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(20)
            .data(
                analysis
                    .condition_counts
                    .iter()
                    .enumerate()
                    .map(|(i, &(_, count))| (i, count)),
            ),
    )?;

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Pie chart of condition distribution with percentage labels.
fn render_pie_chart(analysis: &AnalysisResult, path: &Path, options: &ChartOptions) -> Result<()> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;
    root.titled(
        "Distribution of Conditions in EMR Data",
        ("sans-serif", 30),
    )?;

    let sizes: Vec<f64> = analysis
        .condition_counts
        .iter()
        .map(|&(_, count)| f64::from(count))
        .collect();
    let labels: Vec<&str> = analysis.condition_counts.iter().map(|&(n, _)| n).collect();
    let colors: Vec<RGBColor> = PIE_PALETTE
        .iter()
        .copied()
        .cycle()
        .take(sizes.len())
        .collect();

    let center = (options.width as i32 / 2, options.height as i32 / 2);
    let radius = f64::from(options.width.min(options.height)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 20).into_font());
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Age histogram over the fixed decade buckets.
fn render_age_histogram(
    table: &PatientTable,
    view: View,
    path: &Path,
    options: &ChartOptions,
) -> Result<()> {
    let counts = bucket_counts(&table.present_ages());
    let max_count = counts.iter().copied().max().unwrap_or(0);

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(view.histogram_title(), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            AGE_BUCKET_EDGES[0]..AGE_BUCKET_EDGES[AGE_BUCKET_EDGES.len() - 1],
            0u32..max_count + 1,
        )?;

    chart
        .configure_mesh()
        .x_desc("Age")
        .y_desc("Number of Patients")
        .x_labels(AGE_BUCKET_EDGES.len())
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new(
            [(AGE_BUCKET_EDGES[i], 0), (AGE_BUCKET_EDGES[i + 1], count)],
            HIST_COLOR.filled(),
        )
    }))?;
    // Bucket borders drawn on top of the fill
    chart.draw_series(counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new(
            [(AGE_BUCKET_EDGES[i], 0), (AGE_BUCKET_EDGES[i + 1], count)],
            BLACK.stroke_width(2),
        )
    }))?;

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Count ages per bucket. Buckets are half-open except the last, which
/// includes its upper edge; out-of-range ages are dropped.
fn bucket_counts(ages: &[u32]) -> [u32; AGE_BUCKET_EDGES.len() - 1] {
    let mut counts = [0u32; AGE_BUCKET_EDGES.len() - 1];

    for &age in ages {
        for i in 0..counts.len() {
            let lo = AGE_BUCKET_EDGES[i];
            let hi = AGE_BUCKET_EDGES[i + 1];
            let last = i == counts.len() - 1;
            if age >= lo && (age < hi || (last && age == hi)) {
                counts[i] += 1;
                break;
            }
        }
    }

    counts
}
