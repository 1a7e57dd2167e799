//! Training frame construction from raw price history.

use crate::error::{AppError, Result};
use crate::types::{PricePoint, TrainingFrame, TrainingPoint};
use tracing::warn;

/// Minimum observations the model needs to fit anything at all.
pub const MIN_TRAINING_ROWS: usize = 2;

/// Reduce raw OHLCV bars to the (date, close) series the model trains on.
///
/// Rows whose close is not a finite number are dropped and counted, never
/// imputed. Fewer than two surviving rows is an error; the engine is never
/// invoked below that minimum.
pub fn build_training_frame(series: &[PricePoint]) -> Result<TrainingFrame> {
    let mut points = Vec::with_capacity(series.len());
    let mut dropped_rows = 0usize;

    for bar in series {
        if bar.close.is_finite() {
            points.push(TrainingPoint {
                date: bar.date,
                value: bar.close,
            });
        } else {
            dropped_rows += 1;
        }
    }

    if dropped_rows > 0 {
        warn!(
            "Dropped {} of {} rows during training frame coercion",
            dropped_rows,
            series.len()
        );
    }

    if points.len() < MIN_TRAINING_ROWS {
        return Err(AppError::InsufficientData {
            usable_rows: points.len(),
        });
    }

    Ok(TrainingFrame { points, dropped_rows })
}
