//! Shared types for TRENDCAST.
//!
//! These types form the data model passed between the prompt parser,
//! the forecasting strategies and the HTTP layer. None of them outlive
//! a single request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizon used when the prompt does not ask for one.
pub const DEFAULT_HORIZON: usize = 100;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A parsed forecast request: the historical series plus the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Historical observations, oldest first. Never empty once parsed.
    pub series: Vec<f64>,
    /// Number of future steps to produce.
    pub horizon: usize,
}

impl fmt::Display for ForecastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}, horizon={}", self.series.len(), self.horizon)
    }
}

// ---------------------------------------------------------------------------
// Forecast bundle
// ---------------------------------------------------------------------------

/// Point and interval forecast returned to the client.
///
/// Serialized as the JSON document embedded in the chat completion's
/// message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    /// Median forecast, one value per horizon step.
    pub p50: Vec<f64>,
    /// Lower band (~10th percentile).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p10: Option<Vec<f64>>,
    /// Upper band (~90th percentile).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p90: Option<Vec<f64>>,
    pub notes: String,
    pub quality_flags: Vec<QualityFlag>,
}

impl ForecastBundle {
    /// Number of forecast steps.
    pub fn len(&self) -> usize {
        self.p50.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p50.is_empty()
    }

    /// Whether both interval bands are present.
    pub fn has_bands(&self) -> bool {
        self.p10.is_some() && self.p90.is_some()
    }

    pub fn has_flag(&self, flag: QualityFlag) -> bool {
        self.quality_flags.contains(&flag)
    }
}

impl fmt::Display for ForecastBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<String> = self.quality_flags.iter().map(|q| q.to_string()).collect();
        write!(
            f,
            "{} steps | bands: {} | flags: [{}]",
            self.len(),
            if self.has_bands() { "yes" } else { "no" },
            flags.join(", "),
        )
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Machine-readable caveat attached to a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityFlag {
    LowData,
    HighMissing,
    IrregularSampling,
    OutliersPresent,
    LongHorizonUncertain,
    RegimeShiftDetected,
}

impl QualityFlag {
    /// Every tag the client understands.
    pub const ALL: &'static [QualityFlag] = &[
        QualityFlag::LowData,
        QualityFlag::HighMissing,
        QualityFlag::IrregularSampling,
        QualityFlag::OutliersPresent,
        QualityFlag::LongHorizonUncertain,
        QualityFlag::RegimeShiftDetected,
    ];
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityFlag::LowData => write!(f, "LOW_DATA"),
            QualityFlag::HighMissing => write!(f, "HIGH_MISSING"),
            QualityFlag::IrregularSampling => write!(f, "IRREGULAR_SAMPLING"),
            QualityFlag::OutliersPresent => write!(f, "OUTLIERS_PRESENT"),
            QualityFlag::LongHorizonUncertain => write!(f, "LONG_HORIZON_UNCERTAIN"),
            QualityFlag::RegimeShiftDetected => write!(f, "REGIME_SHIFT_DETECTED"),
        }
    }
}

/// Forecasting strategy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// OLS trend line with a constant z-score band.
    #[default]
    LinearTrend,
    /// Last value plus average drift with a ±15% magnitude band.
    Drift,
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastMethod::LinearTrend => write!(f, "linear_trend"),
            ForecastMethod::Drift => write!(f, "drift"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures while turning a prompt into a forecast.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Could not parse time-series data from prompt")]
    EmptySeries,

    #[error("Forecast horizon must be a positive integer")]
    ZeroHorizon,

    #[error("Forecast horizon {requested} exceeds the maximum of {max}")]
    HorizonTooLong { requested: usize, max: usize },

    #[error("Invalid forecast: {0}")]
    InvalidForecast(String),
}

impl ForecastError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ForecastError::InvalidForecast(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
