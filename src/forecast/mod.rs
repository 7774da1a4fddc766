//! Forecasting strategies.
//!
//! Defines the `Forecaster` trait and provides a linear-trend
//! implementation (the default) and a last-value drift implementation.
//! The HTTP layer receives a strategy through its state rather than
//! reaching for a process-wide model.

pub mod drift;
pub mod quality;
pub mod stats;
pub mod trend;
pub mod validate;

use crate::types::{ForecastBundle, ForecastError, ForecastMethod, ForecastRequest};

pub use drift::DriftForecaster;
pub use trend::TrendForecaster;
pub use validate::validate_bundle;

/// Abstraction over forecasting strategies.
///
/// Implementors turn a non-empty series and a positive horizon into a
/// bundle with exactly `horizon` steps.
#[cfg_attr(test, mockall::automock)]
pub trait Forecaster: Send + Sync {
    /// Forecast `horizon` steps past the end of `series`.
    fn forecast(&self, series: &[f64], horizon: usize) -> Result<ForecastBundle, ForecastError>;

    /// Which strategy this is.
    fn method(&self) -> ForecastMethod;
}

/// Forecast a parsed request with the given strategy.
pub fn run(forecaster: &dyn Forecaster, request: &ForecastRequest) -> Result<ForecastBundle, ForecastError> {
    if request.series.is_empty() {
        return Err(ForecastError::EmptySeries);
    }
    if request.horizon == 0 {
        return Err(ForecastError::ZeroHorizon);
    }
    let bundle = forecaster.forecast(&request.series, request.horizon)?;
    validate_bundle(&bundle, request.horizon)?;
    Ok(bundle)
}

/// Build the strategy selected in configuration.
pub fn forecaster_for(method: ForecastMethod) -> Box<dyn Forecaster> {
    match method {
        ForecastMethod::LinearTrend => Box::new(TrendForecaster::new()),
        ForecastMethod::Drift => Box::new(DriftForecaster::new()),
    }
}
