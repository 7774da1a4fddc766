//! Integration tests for the public API.

mod api;
mod pipeline;
