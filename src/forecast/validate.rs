//! Sanity checks applied to every bundle before it leaves the server.

use crate::types::{ForecastBundle, ForecastError};

/// Check shape, quantile ordering and finiteness of a bundle.
///
/// Errors are reported as [`ForecastError::InvalidForecast`], listing
/// every problem found.
pub fn validate_bundle(bundle: &ForecastBundle, horizon: usize) -> Result<(), ForecastError> {
    let mut errors: Vec<String> = Vec::new();

    if bundle.p50.len() != horizon {
        errors.push(format!("p50 length {} != expected {horizon}", bundle.p50.len()));
    }

    match (&bundle.p10, &bundle.p90) {
        (None, None) => {}
        (Some(p10), Some(p90)) => {
            if p10.len() != horizon {
                errors.push(format!("p10 length {} != expected {horizon}", p10.len()));
            }
            if p90.len() != horizon {
                errors.push(format!("p90 length {} != expected {horizon}", p90.len()));
            }
            let violation = p10
                .iter()
                .zip(&bundle.p50)
                .zip(p90)
                .position(|((lo, mid), hi)| !(lo <= mid && mid <= hi));
            if let Some(i) = violation {
                errors.push(format!(
                    "quantile violation at index {i}: p10={}, p50={}, p90={}",
                    p10[i], bundle.p50[i], p90[i]
                ));
            }
        }
        _ => errors.push("p10 and p90 must be provided together".to_string()),
    }

    let non_finite = bundle
        .p50
        .iter()
        .chain(bundle.p10.iter().flatten())
        .chain(bundle.p90.iter().flatten())
        .any(|v| !v.is_finite());
    if non_finite {
        errors.push("non-finite values detected".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ForecastError::InvalidForecast(errors.join("; ")))
    }
}
