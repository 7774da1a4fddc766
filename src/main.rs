//! TRENDCAST — forecasting server entry point.
//!
//! Loads `.env` and configuration, initialises structured logging,
//! builds the forecasting strategy and serves the HTTP API until
//! Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use trendcast::config::AppConfig;
use trendcast::server::{self, ServerState};

const BANNER: &str = r#"
 _                      _               _
| |_ _ __ ___ _ __   __| | ___ __ _ ___| |_
| __| '__/ _ \ '_ \ / _` |/ __/ _` / __| __|
| |_| | |  __/ | | | (_| | (_| (_| \__ \ |_
 \__|_|  \___|_| |_|\__,_|\___\__,_|___/\__|

  Trend forecasting with an OpenAI-compatible API
  Endpoints: GET /health | GET /v1/models | POST /v1/chat/completions
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::from_env()?;

    init_logging(&cfg);

    println!("{BANNER}");

    let addr = cfg.bind_addr()?;
    info!(
        %addr,
        model = %cfg.model.id,
        method = %cfg.forecast.method,
        max_horizon = cfg.forecast.max_horizon,
        "TRENDCAST starting up"
    );

    let state = Arc::new(ServerState::from_config(&cfg));
    server::serve(state, addr).await
}

/// Initialise the `tracing` subscriber.
fn init_logging(cfg: &AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trendcast=info,tower_http=info"));

    let json_logging = cfg.logging.json || std::env::var("TRENDCAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
