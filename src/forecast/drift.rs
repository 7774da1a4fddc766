//! Last-value drift forecaster.
//!
//! Projects the last observation forward by the average per-step change
//! `(last - first) / n`, with a band of ±15% of each forecast's magnitude.

use super::{quality, Forecaster};
use crate::types::{ForecastBundle, ForecastError, ForecastMethod};

/// Band half-width as a fraction of the forecast's magnitude.
pub const BAND_FRACTION: f64 = 0.15;

#[derive(Debug, Clone, Default)]
pub struct DriftForecaster;

impl DriftForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for DriftForecaster {
    fn forecast(&self, series: &[f64], horizon: usize) -> Result<ForecastBundle, ForecastError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return Err(ForecastError::EmptySeries),
        };
        let n = series.len();
        let drift = (last - first) / n as f64;

        let p50: Vec<f64> = (1..=horizon).map(|step| last + drift * step as f64).collect();
        let p10 = p50.iter().map(|v| v - v.abs() * BAND_FRACTION).collect();
        let p90 = p50.iter().map(|v| v + v.abs() * BAND_FRACTION).collect();

        Ok(ForecastBundle {
            p50,
            p10: Some(p10),
            p90: Some(p90),
            notes: format!("Forecast generated using last-value drift extrapolation (n={n}, horizon={horizon})"),
            quality_flags: quality::assess(n, horizon),
        })
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::Drift
    }
}
