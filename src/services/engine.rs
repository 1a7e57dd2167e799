//! Forecast engine: additive trend + seasonality model.
//!
//! The default model fits a linear trend plus weekly and yearly Fourier
//! terms by least squares, then extends the fitted curve over the
//! requested horizon. Confidence bounds come from the residual spread
//! scaled by the normal quantile of the requested interval width, and
//! widen as the forecast moves past the observed data.

use crate::error::AppError;
use crate::types::{ForecastPoint, TrainingFrame};
use chrono::Duration;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::debug;

const WEEKLY_PERIOD_DAYS: f64 = 7.0;
const YEARLY_PERIOD_DAYS: f64 = 365.25;

/// Errors produced while fitting or extending the model.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("not enough observations to fit a model")]
    TooFewPoints,

    #[error("design matrix is too ill-conditioned to solve")]
    SingularFit,

    #[error("interval width must be within (0, 1), got {0}")]
    InvalidIntervalWidth(f64),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

/// Model boundary of the pipeline. Synchronous and deterministic: the
/// same frame, horizon and width always produce the same rows.
pub trait ForecastEngine: Send + Sync {
    /// Fit the training frame and emit one row per training date plus one
    /// per future calendar day out to `horizon_days`. Every row satisfies
    /// `lower <= forecast <= upper`.
    fn forecast(
        &self,
        frame: &TrainingFrame,
        horizon_days: u32,
        interval_width: f64,
    ) -> Result<Vec<ForecastPoint>, EngineError>;
}

/// Linear trend + weekly/yearly seasonality fitted by SVD least squares.
pub struct SeasonalTrendModel {
    weekly_order: usize,
    yearly_order: usize,
}

impl Default for SeasonalTrendModel {
    fn default() -> Self {
        Self {
            weekly_order: 3,
            yearly_order: 10,
        }
    }
}

impl SeasonalTrendModel {
    #[allow(dead_code)]
    pub fn new(weekly_order: usize, yearly_order: usize) -> Self {
        Self {
            weekly_order,
            yearly_order,
        }
    }

    fn columns(&self) -> usize {
        2 + 2 * self.weekly_order + 2 * self.yearly_order
    }

    /// Feature row for an observation `t` days after the first one.
    /// `span` scales the trend column into [0, 1] over the training
    /// window to keep the system well conditioned.
    fn push_design_row(&self, out: &mut Vec<f64>, t: f64, span: f64) {
        out.push(1.0);
        out.push(t / span);
        for k in 1..=self.weekly_order {
            let angle = 2.0 * std::f64::consts::PI * k as f64 * t / WEEKLY_PERIOD_DAYS;
            out.push(angle.sin());
            out.push(angle.cos());
        }
        for k in 1..=self.yearly_order {
            let angle = 2.0 * std::f64::consts::PI * k as f64 * t / YEARLY_PERIOD_DAYS;
            out.push(angle.sin());
            out.push(angle.cos());
        }
    }

    fn predict(&self, beta: &DVector<f64>, t: f64, span: f64) -> f64 {
        let mut row = Vec::with_capacity(self.columns());
        self.push_design_row(&mut row, t, span);
        row.iter()
            .zip(beta.iter())
            .map(|(x, b)| x * b)
            .sum()
    }
}

/// Solve the least-squares system with SVD, loosening the singular value
/// cutoff stepwise when a strict solve is rejected. Daily sampling can
/// leave the low-order yearly harmonics nearly collinear with the trend
/// on short histories.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }
    None
}

/// Inverse of the standard normal CDF (Acklam's rational approximation,
/// relative error below 1.2e-9). Input must be inside (0, 1).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

impl ForecastEngine for SeasonalTrendModel {
    fn forecast(
        &self,
        frame: &TrainingFrame,
        horizon_days: u32,
        interval_width: f64,
    ) -> Result<Vec<ForecastPoint>, EngineError> {
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(EngineError::InvalidIntervalWidth(interval_width));
        }

        let n = frame.len();
        if n < 2 {
            return Err(EngineError::TooFewPoints);
        }

        let origin = frame.points[0].date;
        let offsets: Vec<f64> = frame
            .points
            .iter()
            .map(|p| (p.date - origin).num_days() as f64)
            .collect();
        let span = offsets.last().copied().unwrap_or(1.0).max(1.0);

        let cols = self.columns();
        let mut design = Vec::with_capacity(n * cols);
        for &t in &offsets {
            self.push_design_row(&mut design, t, span);
        }
        let x = DMatrix::from_row_slice(n, cols, &design);
        let y = DVector::from_iterator(n, frame.points.iter().map(|p| p.value));

        let beta = solve_least_squares(&x, &y).ok_or(EngineError::SingularFit)?;

        let fitted = &x * &beta;
        let residual_var = frame
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let r = p.value - fitted[i];
                r * r
            })
            .sum::<f64>()
            / (n - 1).max(1) as f64;
        let sigma = residual_var.sqrt();

        let z = normal_quantile(0.5 + interval_width / 2.0);
        debug!(
            "Fitted {} columns over {} rows, sigma={:.4}, z={:.3}",
            cols, n, sigma, z
        );

        let last_offset = span;
        let last_date = frame.points[n - 1].date;
        let mut rows = Vec::with_capacity(n + horizon_days as usize);

        for (i, point) in frame.points.iter().enumerate() {
            let yhat = fitted[i];
            let half = z * sigma;
            rows.push(ForecastPoint {
                date: point.date,
                forecast: yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }

        for k in 1..=horizon_days as i64 {
            let t = last_offset + k as f64;
            let yhat = self.predict(&beta, t, span);
            // Uncertainty grows with distance from the observed window
            let half = z * sigma * (1.0 + k as f64 / span).sqrt();
            rows.push(ForecastPoint {
                date: last_date + Duration::days(k),
                forecast: yhat,
                lower: yhat - half,
                upper: yhat + half,
            });
        }

        Ok(rows)
    }
}
