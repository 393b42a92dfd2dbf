// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio Tracker API Server
//!
//! Scans wallets on Ethereum, Polygon, BSC and Solana, prices holdings via
//! CoinGecko and serves the browser frontend.

use portfolio_tracker::{cache::PURGE_INTERVAL, config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Portfolio Tracker API");
    tracing::info!(
        coingecko = %config.coingecko_base_url,
        api_key = config.coingecko_api_key.is_some(),
        static_dir = ?config.static_dir,
        "Upstream configuration"
    );

    // One connection pool for CoinGecko and every RPC node
    let http = reqwest::Client::builder()
        .user_agent(concat!("portfolio-tracker/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let state = Arc::new(AppState::new(config.clone(), http));

    // Periodically sweep expired cache entries
    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = purge_state.purge_stale_caches();
            if purged > 0 {
                tracing::debug!(purged, "Purged stale cache entries");
            }
        }
    });

    // Build router
    let app = portfolio_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
