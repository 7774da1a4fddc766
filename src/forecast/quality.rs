//! Quality-flag assessment.

use crate::types::QualityFlag;

use super::stats;

/// Below this many observations a forecast is flagged `LOW_DATA`.
pub const LOW_DATA_THRESHOLD: usize = 50;

/// Above this many steps a forecast is flagged `LONG_HORIZON_UNCERTAIN`.
pub const LONG_HORIZON_THRESHOLD: usize = 500;

/// Noise scale above this fraction of the mean absolute value is flagged
/// `HIGH_MISSING`.
pub const HIGH_NOISE_RATIO: f64 = 0.3;

/// Flags driven by data volume and horizon alone.
pub fn assess(n: usize, horizon: usize) -> Vec<QualityFlag> {
    let mut flags = Vec::new();
    if n < LOW_DATA_THRESHOLD {
        flags.push(QualityFlag::LowData);
    }
    if horizon > LONG_HORIZON_THRESHOLD {
        flags.push(QualityFlag::LongHorizonUncertain);
    }
    flags
}

/// [`assess`] plus the noise-to-signal check.
pub fn assess_with_noise(series: &[f64], horizon: usize, noise_scale: f64) -> Vec<QualityFlag> {
    let mut flags = assess(series.len(), horizon);
    if noise_scale > stats::mean_abs(series) * HIGH_NOISE_RATIO {
        flags.push(QualityFlag::HighMissing);
    }
    flags
}
