//! `NeighborNudge` API server -- community mutual-aid task board.
//!
//! An axum HTTP server exposing the task ledger, points leaderboard,
//! community feed, and cross-post link generation.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080
//! cargo run --bin nudge-server
//!
//! # Run on custom address
//! cargo run --bin nudge-server -- --bind 127.0.0.1:3000
//!
//! # Or via environment variable
//! NUDGE_ADDR=127.0.0.1:3000 cargo run --bin nudge-server
//! ```

use std::sync::Arc;

use clap::Parser;
use nudge_reddit::FeedClient;
use nudge_server::api::{self, AppState};
use nudge_server::config::{NudgeCliArgs, NudgeConfig};
use nudge_server::ledger::Ledger;
use nudge_server::store::MemoryStore;

#[tokio::main]
async fn main() {
    let cli = NudgeCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match NudgeConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        subreddit = %config.subreddit,
        "starting neighbornudge api server"
    );

    let ledger = Ledger::new(Arc::new(MemoryStore::new()));
    let feed = FeedClient::new(&config.subreddit);
    let state = Arc::new(AppState::new(ledger, feed, config.feed_limit));

    match api::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "api server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start api server");
            std::process::exit(1);
        }
    }
}
