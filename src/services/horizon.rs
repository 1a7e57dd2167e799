//! Prediction period resolution.

use crate::error::{AppError, Result};
use crate::types::PeriodUnit;

/// Convert a (unit, magnitude) period into a horizon in days.
///
/// Days are bounded to 1..=90. Months and years convert with fixed
/// factors (30 and 365) and carry no bound here; the request layer
/// enforces the picklist ranges (1-12 months, 1-4 years) before the
/// pipeline runs, mirroring the form controls this service grew out of.
pub fn resolve_horizon(unit: PeriodUnit, magnitude: u32) -> Result<u32> {
    match unit {
        PeriodUnit::Days => {
            if !(1..=90).contains(&magnitude) {
                return Err(AppError::InvalidPeriod(
                    "Days must be between 1 and 90.".to_string(),
                ));
            }
            Ok(magnitude)
        }
        PeriodUnit::Months => Ok(magnitude * 30),
        PeriodUnit::Years => Ok(magnitude * 365),
    }
}
