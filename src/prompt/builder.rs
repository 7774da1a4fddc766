//! Prompt construction.
//!
//! Renders a history and horizon into the prompt format accepted by
//! [`PromptParser`](super::PromptParser), so clients and tests can
//! produce requests the server understands.

use crate::forecast::stats;
use crate::types::QualityFlag;

/// Number of trailing observations embedded in the prompt.
pub const CONTEXT_WINDOW: usize = 50;

/// Builds forecasting prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    pub horizon: usize,
    pub uncertainty: bool,
}

impl PromptBuilder {
    pub fn new(horizon: usize) -> Self {
        Self { horizon, uncertainty: true }
    }

    pub fn with_uncertainty(mut self, uncertainty: bool) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Render the full prompt for `history` (oldest first).
    pub fn build(&self, history: &[f64]) -> String {
        let h = self.horizon;
        let ctx = ContextStats::from_values(history);
        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        let last_values: Vec<String> = history[start..].iter().map(|v| format!("{v:.2}")).collect();

        let flag_names: Vec<String> = QualityFlag::ALL.iter().map(|f| f.to_string()).collect();

        let quantiles = if self.uncertainty {
            " Provide P10, P50, and P90 quantiles."
        } else {
            " Provide point predictions (P50)."
        };
        let band_fields = if self.uncertainty {
            format!("  \"p10\": [/* {h} numbers */],\n  \"p90\": [/* {h} numbers */],\n")
        } else {
            String::new()
        };
        let ordering = if self.uncertainty {
            "- p10[i] <= p50[i] <= p90[i] for all i\n"
        } else {
            ""
        };

        format!(
            "You are a time-series forecasting expert. Generate a {h}-step forecast for the following sensor data.\n\
             \n\
             **Context Statistics:**\n\
             - Data points: {count}\n\
             - Min: {min:.2}, Max: {max:.2}, Mean: {mean:.2}, Std: {std:.2}\n\
             - Trend: {trend}\n\
             \n\
             **Last {window} values:**\n\
             {values}\n\
             \n\
             **Task:**\n\
             Forecast the next {h} values.{quantiles}\n\
             \n\
             **Output Format (strict JSON only):**\n\
             {{\n  \"p50\": [/* {h} numbers */],\n{band_fields}  \"notes\": \"Brief reasoning (1 sentence)\",\n  \"quality_flags\": [/* array of applicable flags from: {flags} */]\n}}\n\
             \n\
             Ensure:\n\
             {ordering}- All arrays have exactly {h} elements\n\
             - Values are realistic given the context\n\
             \n\
             Return ONLY valid JSON, no markdown or explanations.",
            count = history.len(),
            min = ctx.min,
            max = ctx.max,
            mean = ctx.mean,
            std = ctx.std,
            trend = ctx.trend,
            window = CONTEXT_WINDOW,
            values = last_values.join(", "),
            flags = flag_names.join(", "),
        )
    }
}

/// Summary statistics shown at the top of the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub trend: &'static str,
}

impl ContextStats {
    pub fn from_values(values: &[f64]) -> Self {
        let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return Self { min: 0.0, max: 0.0, mean: 0.0, std: 0.0, trend: "unknown" };
        }

        let mean = stats::mean(&values);
        let std = if values.len() > 1 { stats::population_std(&values) } else { 0.0 };

        // Compare half means with a ±10% band.
        let mid = values.len() / 2;
        let first = stats::mean(&values[..mid]);
        let second = stats::mean(&values[mid..]);
        let trend = if values.len() < 2 {
            "stable"
        } else if second > first * 1.1 {
            "increasing"
        } else if second < first * 0.9 {
            "decreasing"
        } else {
            "stable"
        };

        Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std,
            trend,
        }
    }
}
