//! PNG snapshot of the forecast chart.
//!
//! Each successful forecast is archived as a bitmap under the configured
//! chart directory. No font backend is compiled in, so the snapshot draws
//! the series and confidence band only, without axis text.

use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use plotters::prelude::*;

use crate::types::{ForecastPoint, TrainingFrame};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

const BACKGROUND: RGBColor = RGBColor(17, 24, 39);
const HISTORICAL: RGBColor = RGBColor(59, 130, 246);
const FORECAST: RGBColor = RGBColor(96, 165, 250);

/// Render the history, forecast line and confidence band to
/// `{today}_{symbol-without-suffix}.png` under `dir`. Returns the file
/// name on success.
pub fn save_chart_image(
    dir: &Path,
    symbol: &str,
    suffix: &str,
    frame: &TrainingFrame,
    forecast: &[ForecastPoint],
) -> anyhow::Result<String> {
    let first = frame
        .points
        .first()
        .context("no training rows to draw")?
        .date;
    let last = forecast
        .last()
        .map(|p| p.date)
        .or_else(|| frame.last_date())
        .context("no rows to draw")?;
    if first >= last {
        anyhow::bail!("date range too narrow to draw");
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for point in &frame.points {
        y_min = y_min.min(point.value);
        y_max = y_max.max(point.value);
    }
    for point in forecast {
        y_min = y_min.min(point.lower);
        y_max = y_max.max(point.upper);
    }
    if !(y_min.is_finite() && y_max.is_finite()) {
        anyhow::bail!("non-finite values in chart data");
    }
    let padding = ((y_max - y_min).abs() * 0.05).max(1.0);
    y_min -= padding;
    y_max += padding;

    std::fs::create_dir_all(dir).context("create chart directory")?;
    let file_name = format!(
        "{}_{}.png",
        Local::now().date_naive().format("%Y-%m-%d"),
        symbol.replace(suffix, "")
    );
    let path = dir.join(&file_name);

    let root = BitMapBackend::new(&path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&BACKGROUND)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(first..last, y_min..y_max)?;

    // Confidence band under the lines: upper edge left to right, then
    // lower edge back, as one filled polygon.
    let mut band: Vec<(NaiveDate, f64)> = forecast.iter().map(|p| (p.date, p.upper)).collect();
    band.extend(forecast.iter().rev().map(|p| (p.date, p.lower)));
    chart.draw_series(std::iter::once(Polygon::new(band, HISTORICAL.mix(0.2))))?;

    chart.draw_series(LineSeries::new(
        frame.points.iter().map(|p| (p.date, p.value)),
        &HISTORICAL,
    ))?;

    chart.draw_series(LineSeries::new(
        forecast.iter().map(|p| (p.date, p.forecast)),
        &FORECAST,
    ))?;

    root.present().context("write chart image")?;
    Ok(file_name)
}
