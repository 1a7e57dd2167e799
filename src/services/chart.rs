//! Chart payload assembly.
//!
//! Turns the training frame, forecast rows and fundamentals into the
//! trace lists the frontend plots, plus the CSV tables offered for
//! download. Colors and trace order are part of the dashboard's look
//! and are fixed here.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::services::indicators::{rsi_series, sma_series};
use crate::types::{
    BarSeries, ChartPayload, ChartTrace, ExportTable, ForecastPoint, PeriodUnit, PricePoint,
    QuarterlyEarnings, StockInfo, TraceAxis, TrainingFrame,
};

const HISTORICAL_COLOR: &str = "#3b82f6";
const FORECAST_COLOR: &str = "#60a5fa";
const BOUND_LINE_COLOR: &str = "rgba(0, 0, 0, 0)";
const BAND_FILL_COLOR: &str = "rgba(59, 130, 246, 0.2)";
const MA_COLOR: &str = "#facc15";
const RSI_COLOR: &str = "#ec4899";
const EARNINGS_COLOR: &str = "#3b82f6";
const PROFIT_COLOR: &str = "#10b981";

const MA_WINDOW: usize = 50;
const RSI_PERIOD: usize = 14;

/// Which traces to include and which theme template to emit.
#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub show_historical: bool,
    pub show_forecast: bool,
    pub show_bounds: bool,
    pub show_ma: bool,
    pub show_rsi: bool,
    pub dark_theme: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_historical: true,
            show_forecast: true,
            show_bounds: true,
            show_ma: false,
            show_rsi: false,
            dark_theme: true,
        }
    }
}

/// Build the main forecast chart.
pub fn build_chart(
    info: &StockInfo,
    frame: &TrainingFrame,
    forecast: &[ForecastPoint],
    magnitude: u32,
    unit: PeriodUnit,
    options: &ChartOptions,
) -> ChartPayload {
    let mut traces = Vec::new();

    let history_dates: Vec<NaiveDate> = frame.points.iter().map(|p| p.date).collect();
    let history_values: Vec<f64> = frame.points.iter().map(|p| p.value).collect();

    if options.show_historical {
        traces.push(ChartTrace::line(
            "Historical",
            history_dates.clone(),
            history_values.iter().map(|&v| Some(v)).collect(),
            HISTORICAL_COLOR,
        ));
    }

    let forecast_dates: Vec<NaiveDate> = forecast.iter().map(|p| p.date).collect();

    if options.show_forecast {
        traces.push(ChartTrace::line(
            "Forecast",
            forecast_dates.clone(),
            forecast.iter().map(|p| Some(p.forecast)).collect(),
            FORECAST_COLOR,
        ));
    }

    // The band is drawn as an invisible upper line plus a lower line
    // filled up to it, so the two traces must stay adjacent.
    if options.show_bounds && options.show_forecast {
        traces.push(ChartTrace {
            name: "Upper Bound".to_string(),
            x: forecast_dates.clone(),
            y: forecast.iter().map(|p| Some(p.upper)).collect(),
            color: BOUND_LINE_COLOR.to_string(),
            axis: TraceAxis::Price,
            fill_to_previous: false,
            fill_color: None,
            show_legend: false,
        });
        traces.push(ChartTrace {
            name: "Lower Bound".to_string(),
            x: forecast_dates,
            y: forecast.iter().map(|p| Some(p.lower)).collect(),
            color: BOUND_LINE_COLOR.to_string(),
            axis: TraceAxis::Price,
            fill_to_previous: true,
            fill_color: Some(BAND_FILL_COLOR.to_string()),
            show_legend: true,
        });
    }

    if options.show_ma {
        traces.push(ChartTrace {
            name: "50-day MA".to_string(),
            x: history_dates.clone(),
            y: sma_series(&history_values, MA_WINDOW),
            color: MA_COLOR.to_string(),
            axis: TraceAxis::Price,
            fill_to_previous: false,
            fill_color: None,
            show_legend: true,
        });
    }

    if options.show_rsi {
        traces.push(ChartTrace {
            name: "RSI (14)".to_string(),
            x: history_dates,
            y: rsi_series(&history_values, RSI_PERIOD),
            color: RSI_COLOR.to_string(),
            axis: TraceAxis::Oscillator,
            fill_to_previous: false,
            fill_color: None,
            show_legend: true,
        });
    }

    ChartPayload {
        title: format!("{} Forecast for {} {}", info.display_name(), magnitude, unit),
        template: if options.dark_theme { "plotly_dark" } else { "plotly_white" }.to_string(),
        traces,
        oscillator_range: options.show_rsi.then_some((0.0, 100.0)),
    }
}

/// Quarterly net income bars. `None` when no earnings were reported.
pub fn build_earnings_chart(info: &StockInfo, earnings: &[QuarterlyEarnings]) -> Option<BarSeries> {
    if earnings.is_empty() {
        return None;
    }

    Some(BarSeries {
        title: format!("{} Quarterly Earnings", info.display_name()),
        name: "Net Income".to_string(),
        x: earnings.iter().map(|e| e.period_end).collect(),
        y: earnings.iter().map(|e| e.net_income).collect(),
        color: EARNINGS_COLOR.to_string(),
    })
}

/// Net income bucketed by calendar month, plotted at month end.
/// `None` when no earnings were reported.
pub fn build_monthly_profit_chart(
    info: &StockInfo,
    earnings: &[QuarterlyEarnings],
) -> Option<BarSeries> {
    if earnings.is_empty() {
        return None;
    }

    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for entry in earnings {
        let key = (entry.period_end.year(), entry.period_end.month());
        *by_month.entry(key).or_insert(0.0) += entry.net_income;
    }

    let mut x = Vec::with_capacity(by_month.len());
    let mut y = Vec::with_capacity(by_month.len());
    for ((year, month), total) in by_month {
        if let Some(end) = month_end(year, month) {
            x.push(end);
            y.push(total);
        }
    }

    Some(BarSeries {
        title: format!("{} Monthly Profit", info.display_name()),
        name: "Monthly Profit".to_string(),
        x,
        y,
        color: PROFIT_COLOR.to_string(),
    })
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Forecast rows as the downloadable four-column table.
pub fn forecast_table(forecast: &[ForecastPoint]) -> ExportTable {
    ExportTable {
        columns: vec![
            "Date".to_string(),
            "Forecast".to_string(),
            "Lower Bound".to_string(),
            "Upper Bound".to_string(),
        ],
        rows: forecast
            .iter()
            .map(|p| {
                vec![
                    p.date.format("%Y-%m-%d").to_string(),
                    p.forecast.to_string(),
                    p.lower.to_string(),
                    p.upper.to_string(),
                ]
            })
            .collect(),
    }
}

/// Raw OHLCV history as a downloadable table.
pub fn history_table(history: &[PricePoint]) -> ExportTable {
    ExportTable {
        columns: vec![
            "Date".to_string(),
            "Open".to_string(),
            "High".to_string(),
            "Low".to_string(),
            "Close".to_string(),
            "Volume".to_string(),
        ],
        rows: history
            .iter()
            .map(|p| {
                vec![
                    p.date.format("%Y-%m-%d").to_string(),
                    p.open.to_string(),
                    p.high.to_string(),
                    p.low.to_string(),
                    p.close.to_string(),
                    p.volume.to_string(),
                ]
            })
            .collect(),
    }
}
