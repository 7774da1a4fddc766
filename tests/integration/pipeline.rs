//! End-to-end pipeline: prompt builder → parser → forecaster.

use trendcast::forecast::{self, forecaster_for, DriftForecaster, Forecaster, TrendForecaster};
use trendcast::prompt::{PromptBuilder, PromptParser};
use trendcast::types::{ForecastError, ForecastMethod, ForecastRequest, QualityFlag};

fn linear_history(n: usize, slope: f64, intercept: f64) -> Vec<f64> {
    (0..n).map(|i| intercept + slope * i as f64).collect()
}

#[test]
fn test_built_prompt_forecasts_linear_history() {
    let history = linear_history(30, 0.5, 20.0);
    let prompt = PromptBuilder::new(10).build(&history);

    let request = PromptParser::default().parse(&prompt).unwrap();
    assert_eq!(request.series.len(), 30);
    assert_eq!(request.horizon, 10);

    let bundle = forecast::run(&TrendForecaster::new(), &request).unwrap();
    assert_eq!(bundle.len(), 10);
    // Next value after 20 + 0.5 * 29 = 34.5
    assert!((bundle.p50[0] - 35.0).abs() < 1e-6);
    assert!((bundle.p50[9] - 39.5).abs() < 1e-6);
    assert!(bundle.has_flag(QualityFlag::LowData));
}

#[test]
fn test_long_history_long_horizon() {
    let history = linear_history(200, -1.0, 1000.0);
    let prompt = PromptBuilder::new(750).build(&history);

    let request = PromptParser::default().parse(&prompt).unwrap();
    // Only the trailing window is embedded in the prompt.
    assert_eq!(request.series.len(), 50);

    let bundle = forecast::run(&TrendForecaster::new(), &request).unwrap();
    assert_eq!(bundle.len(), 750);
    // Exactly 50 observations sits on the threshold and is not flagged.
    assert!(!bundle.has_flag(QualityFlag::LowData));
    assert!(bundle.has_flag(QualityFlag::LongHorizonUncertain));
}

#[test]
fn test_every_strategy_produces_valid_bundles() {
    let request = ForecastRequest {
        series: vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0],
        horizon: 25,
    };
    for method in [ForecastMethod::LinearTrend, ForecastMethod::Drift] {
        let strategy: Box<dyn Forecaster> = forecaster_for(method);
        let bundle = forecast::run(strategy.as_ref(), &request).unwrap();
        assert_eq!(bundle.len(), 25);
        assert!(bundle.has_bands());
    }
}

#[test]
fn test_trend_is_reproducible() {
    let request = ForecastRequest { series: vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0], horizon: 40 };
    let a = forecast::run(&TrendForecaster::new(), &request).unwrap();
    let b = forecast::run(&TrendForecaster::new(), &request).unwrap();
    assert_eq!(a.p50, b.p50);
    assert_eq!(a.p10, b.p10);
    assert_eq!(a.p90, b.p90);
}

#[test]
fn test_drift_strategy_end_to_end() {
    let request = PromptParser::default()
        .parse("Last values:\n10, 20, 30, 40\nForecast the next 2 values")
        .unwrap();
    let bundle = forecast::run(&DriftForecaster::new(), &request).unwrap();
    // drift = (40 - 10) / 4
    assert_eq!(bundle.p50, vec![47.5, 55.0]);
}

#[test]
fn test_overflowing_values_are_server_side_failures() {
    let request = ForecastRequest { series: vec![f64::MAX, -f64::MAX, f64::MAX], horizon: 3 };
    let err = forecast::run(&TrendForecaster::new(), &request).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidForecast(_)));
    assert!(!err.is_client_error());
}
