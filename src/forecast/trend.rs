//! Linear-trend forecaster.
//!
//! Fits an OLS line through `(index, value)` pairs, extrapolates it over
//! the horizon, and wraps the result in a constant-width band of
//! ±1.28 noise scales (the Gaussian 10th/90th percentile z-score).

use tracing::debug;

use super::stats::{self, LinearFit};
use super::{quality, Forecaster};
use crate::types::{ForecastBundle, ForecastError, ForecastMethod};

/// z-score of the 90th percentile of a standard normal.
pub const Z_P90: f64 = 1.28;

/// Band half-width for a single observation, as a fraction of its magnitude.
pub const SINGLE_POINT_NOISE_FRACTION: f64 = 0.1;

/// Trend function fitted to a history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// A single observation: the trend is that value.
    Constant(f64),
    Line(LinearFit),
}

impl Trend {
    pub fn fit(series: &[f64]) -> Self {
        match LinearFit::fit(series) {
            Some(line) => Trend::Line(line),
            None => Trend::Constant(series.first().copied().unwrap_or(0.0)),
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        match self {
            Trend::Constant(v) => *v,
            Trend::Line(line) => line.at(t),
        }
    }
}

/// Noise scale of a history around its trend.
///
/// - `n > 2`: standard deviation of the residuals;
/// - `n == 2`: standard deviation of the raw values;
/// - `n == 1`: 10% of the absolute observation.
pub fn noise_scale(series: &[f64], trend: &Trend) -> f64 {
    match (series.len(), trend) {
        (0, _) => 0.0,
        (1, _) => series[0].abs() * SINGLE_POINT_NOISE_FRACTION,
        (2, _) => stats::population_std(series),
        (_, Trend::Line(line)) => stats::population_std(&line.residuals(series)),
        (_, Trend::Constant(_)) => stats::population_std(series),
    }
}

/// OLS trend + z-score band.
#[derive(Debug, Clone, Default)]
pub struct TrendForecaster;

impl TrendForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for TrendForecaster {
    fn forecast(&self, series: &[f64], horizon: usize) -> Result<ForecastBundle, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::EmptySeries);
        }

        let n = series.len();
        let trend = Trend::fit(series);
        let noise = noise_scale(series, &trend);
        let half_width = Z_P90 * noise;

        let p50: Vec<f64> = (0..horizon).map(|step| trend.at(n as f64 + step as f64)).collect();
        let p10: Vec<f64> = p50.iter().map(|v| v - half_width).collect();
        let p90: Vec<f64> = p50.iter().map(|v| v + half_width).collect();

        let quality_flags = quality::assess_with_noise(series, horizon, noise);

        debug!(n, horizon, noise, ?trend, "Trend forecast computed");

        Ok(ForecastBundle {
            p50,
            p10: Some(p10),
            p90: Some(p90),
            notes: format!("Forecast generated using simplified trend analysis (n={n}, horizon={horizon})"),
            quality_flags,
        })
    }

    fn method(&self) -> ForecastMethod {
        ForecastMethod::LinearTrend
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
