// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Portfolio Tracker: multi-chain crypto wallet balances and valuations
//!
//! This crate provides the backend API that scans Ethereum, Polygon, BSC and
//! Solana wallets for known tokens, prices them through CoinGecko and values
//! client-held portfolios.

pub mod cache;
pub mod chains;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{CoinGeckoClient, PriceService, WalletScanner};
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub prices: PriceService,
    pub scanner: WalletScanner,
    pub started_at: Instant,
}

impl AppState {
    /// Wire up services from `config`, sharing one HTTP client.
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        let coingecko = CoinGeckoClient::new(
            http.clone(),
            config.coingecko_base_url.clone(),
            config.coingecko_api_key.clone(),
        );
        let scanner = WalletScanner::new(http, &config, coingecko.clone());

        Self {
            prices: PriceService::new(coingecko),
            scanner,
            config,
            started_at: Instant::now(),
        }
    }

    /// Drop expired entries from every cache.
    pub fn purge_stale_caches(&self) -> usize {
        self.prices.purge_stale() + self.scanner.purge_stale()
    }
}
