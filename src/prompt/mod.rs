//! Prompt parsing.
//!
//! Extracts the historical series and the requested horizon from a
//! free-form chat prompt. The grammar is line oriented:
//!
//! - a line containing both `Last` and `values` announces that the
//!   *next* line is a comma-separated list of numbers;
//! - a line containing `Forecast the next` carries the horizon as its
//!   first run of digits.
//!
//! Markers are matched independently and in any order. When a marker
//! appears more than once, the last successful match wins.

pub mod builder;

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::types::{ForecastError, ForecastRequest, DEFAULT_HORIZON};

pub use builder::PromptBuilder;

/// Both words must appear on a line for it to count as the values marker.
const VALUES_MARKER_WORDS: [&str; 2] = ["Last", "values"];

const HORIZON_MARKER: &str = "Forecast the next";

/// Largest horizon accepted unless configured otherwise.
pub const DEFAULT_MAX_HORIZON: usize = 10_000;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("digit-run pattern is valid"))
}

/// Line-oriented prompt parser.
#[derive(Debug, Clone)]
pub struct PromptParser {
    max_horizon: usize,
}

impl Default for PromptParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HORIZON)
    }
}

impl PromptParser {
    pub fn new(max_horizon: usize) -> Self {
        Self { max_horizon }
    }

    pub fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    /// Parse a prompt into a series and horizon.
    ///
    /// Fails with [`ForecastError::EmptySeries`] when no values line could
    /// be parsed, and with a horizon error when the requested horizon is
    /// zero or above the configured cap.
    pub fn parse(&self, prompt: &str) -> Result<ForecastRequest, ForecastError> {
        let lines: Vec<&str> = prompt.lines().collect();

        let mut series: Vec<f64> = Vec::new();
        let mut horizon = DEFAULT_HORIZON;

        for (i, line) in lines.iter().enumerate() {
            if is_values_marker(line) {
                match lines.get(i + 1).and_then(|next| parse_values(next)) {
                    Some(values) => series = values,
                    None => debug!(line = i + 1, "Values marker not followed by a numeric list"),
                }
            }

            if line.contains(HORIZON_MARKER) {
                if let Some(h) = first_integer(line) {
                    horizon = h;
                }
            }
        }

        if series.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        if horizon == 0 {
            return Err(ForecastError::ZeroHorizon);
        }
        if horizon > self.max_horizon {
            return Err(ForecastError::HorizonTooLong {
                requested: horizon,
                max: self.max_horizon,
            });
        }

        Ok(ForecastRequest { series, horizon })
    }
}

fn is_values_marker(line: &str) -> bool {
    VALUES_MARKER_WORDS.iter().all(|w| line.contains(w))
}

/// Parse a comma-separated list of finite floats.
///
/// Any malformed or non-finite token discards the whole line. Empty
/// tokens (e.g. a trailing comma) are ignored. A line with no values
/// at all yields `None`.
fn parse_values(line: &str) -> Option<Vec<f64>> {
    let mut values = Vec::new();
    for token in line.trim().split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let v: f64 = token.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        values.push(v);
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// First run of ASCII digits on the line, if it fits in a `usize`.
fn first_integer(line: &str) -> Option<usize> {
    let digits = digit_run().find(line)?;
    match digits.as_str().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(digits = digits.as_str(), "Horizon out of range, ignoring");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
