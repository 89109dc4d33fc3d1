//! SVG chart rendering for latency logs

use crate::{
    defaults::{PLOT_X_STEP_SECS, PLOT_Y_MAX_MS, PLOT_Y_STEP_MS},
    error::{AppError, Result},
    models::{LatencyStatistics, LogHeader, SampleSeries},
};
use plotters::prelude::*;
use std::path::Path;

const CANVAS_SIZE: (u32, u32) = (1024, 768);
const TITLE_AREA_HEIGHT: i32 = 130;
const TITLE_LINE_HEIGHT: i32 = 28;

pub const X_AXIS_LABEL: &str = "Approx. Elapsed Time [s]";
pub const Y_AXIS_LABEL: &str = "RTT [ms]";

/// The four title lines shown above the chart
pub fn title_lines(header: &LogHeader, stats: &LatencyStatistics) -> Vec<String> {
    vec![
        format!(
            "{}B Packets @ {} Packets per Second",
            header.packet_size_bytes,
            header.packets_per_second()
        ),
        format!("Target: {}", header.target_address),
        format!("Machine: {}", header.machine_label),
        format!("Mean Latency: {} ms", stats.format_mean()),
    ]
}

fn plot_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::plot(error.to_string())
}

/// Render the samples of one test as an SVG line chart at `path`
pub fn render_chart(
    path: &Path,
    header: &LogHeader,
    series: &SampleSeries,
    stats: &LatencyStatistics,
) -> Result<()> {
    if series.is_empty() {
        return Err(AppError::no_samples("no samples to plot"));
    }

    let duration = f64::from(header.duration_seconds);
    // Samples above the fixed range are drawn at its ceiling
    let points: Vec<(f64, f64)> = series
        .points(duration)
        .into_iter()
        .map(|(x, y)| (x, y.clamp(0.0, PLOT_Y_MAX_MS)))
        .collect();

    let root = SVGBackend::new(path, CANVAS_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let (title_area, chart_area) = root.split_vertically(TITLE_AREA_HEIGHT);
    for (index, line) in title_lines(header, stats).iter().enumerate() {
        title_area
            .draw(&Text::new(
                line.as_str(),
                (24, 12 + index as i32 * TITLE_LINE_HEIGHT),
                ("sans-serif", 22).into_font(),
            ))
            .map_err(plot_error)?;
    }

    // Label counts that make the mesh land on 10 s and 50 ms steps
    let x_grid_lines = (duration / PLOT_X_STEP_SECS).floor() as usize + 1;
    let y_grid_lines = (PLOT_Y_MAX_MS / PLOT_Y_STEP_MS).floor() as usize + 1;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(24)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(0f64..duration, 0f64..PLOT_Y_MAX_MS)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_labels(x_grid_lines)
        .y_labels(y_grid_lines)
        .max_light_lines(0)
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(points, &BLUE))
        .map_err(plot_error)?;

    root.present().map_err(|e| {
        AppError::plot(format!("cannot write chart '{}': {}", path.display(), e))
    })?;

    Ok(())
}
