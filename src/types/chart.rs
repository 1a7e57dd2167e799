use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Axis a trace is plotted against. Price-denominated traces share one
/// scale; the RSI oscillator gets its own bounded 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceAxis {
    Price,
    Oscillator,
}

/// One line trace of the forecast chart, ready for the frontend to plot.
/// Gaps (indicator warmup, non-trading days) are nulls so x and y always
/// have equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    pub color: String,
    pub axis: TraceAxis,
    /// Shade the area between this trace and the previous one.
    pub fill_to_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    pub show_legend: bool,
}

impl ChartTrace {
    /// Plain price line with legend entry.
    pub fn line(name: &str, x: Vec<NaiveDate>, y: Vec<Option<f64>>, color: &str) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            color: color.to_string(),
            axis: TraceAxis::Price,
            fill_to_previous: false,
            fill_color: None,
            show_legend: true,
        }
    }
}

/// Full forecast chart: title, theme template and ordered traces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub title: String,
    pub template: String,
    pub traces: Vec<ChartTrace>,
    /// Fixed oscillator axis range, present when an RSI trace is included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscillator_range: Option<(f64, f64)>,
}

/// Bar chart series (quarterly earnings, monthly profit).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSeries {
    pub title: String,
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub color: String,
}
