//! TRENDCAST — trend-extrapolation forecasting behind an OpenAI-style chat API.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod prompt;
pub mod forecast;
pub mod server;
