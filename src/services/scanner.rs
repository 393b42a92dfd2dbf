// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet scanner: native + known-token balances priced in USD.
//!
//! One pipeline serves every chain; chain differences come from
//! [`Chain::config`] and the [`ChainRpc`] dialect. Balance and price failures
//! degrade to zero so a flaky node never fails the whole scan.

use crate::cache::{CacheStats, TtlCache};
use crate::chains::{Chain, KnownToken};
use crate::config::Config;
use crate::error::AppError;
use crate::models::wallet::{CacheInfo, ScanStatistics};
use crate::models::{Token, WalletReport, WalletSummary};
use crate::services::coingecko::CoinGeckoClient;
use crate::services::rpc::ChainRpc;
use crate::time_utils::now_rfc3339;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// TTL for per-coin USD prices used while scanning.
pub const COIN_PRICE_TTL: Duration = Duration::from_secs(5 * 60);

const SCAN_STRATEGY: &str = "known-tokens-only";

/// Outcome of the CoinGecko probe for a chain's native asset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceApiCheck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_price: Option<f64>,
    pub message: String,
    pub timestamp: String,
}

impl PriceApiCheck {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Scans wallets on every supported chain.
#[derive(Clone)]
pub struct WalletScanner {
    rpcs: HashMap<Chain, ChainRpc>,
    prices: CoinGeckoClient,
    coin_prices: TtlCache<String, f64>,
    delay_override: Option<Duration>,
}

impl WalletScanner {
    pub fn new(http: reqwest::Client, config: &Config, prices: CoinGeckoClient) -> Self {
        let rpcs = Chain::ALL
            .iter()
            .map(|&chain| {
                (
                    chain,
                    ChainRpc::for_chain(http.clone(), chain, config.rpc_url(chain)),
                )
            })
            .collect();

        Self {
            rpcs,
            prices,
            coin_prices: TtlCache::new(COIN_PRICE_TTL),
            delay_override: config.scan_delay,
        }
    }

    pub fn rpc(&self, chain: Chain) -> &ChainRpc {
        // Every chain in Chain::ALL is registered in new()
        &self.rpcs[&chain]
    }

    fn scan_delay(&self, chain: Chain) -> Duration {
        self.delay_override.unwrap_or(chain.config().scan_delay)
    }

    /// USD price for a CoinGecko id, cached for [`COIN_PRICE_TTL`].
    ///
    /// Failures and missing quotes yield 0 and are not cached.
    pub async fn coin_price(&self, coin_id: &str) -> f64 {
        if let Some(price) = self.coin_prices.get_fresh(&coin_id.to_string()) {
            return price;
        }

        match self.prices.usd_price(coin_id).await {
            Ok(Some(price)) => {
                self.coin_prices.insert(coin_id.to_string(), price);
                price
            }
            Ok(None) => {
                tracing::warn!(coin = coin_id, "No price returned");
                0.0
            }
            Err(e) => {
                tracing::warn!(coin = coin_id, error = %e, "Price fetch failed");
                0.0
            }
        }
    }

    async fn native_balance_or_zero(&self, chain: Chain, address: &str) -> f64 {
        match self.rpc(chain).native_balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::error!(chain = %chain, address, error = %e, "Native balance fetch failed");
                0.0
            }
        }
    }

    async fn token_balance_or_zero(&self, chain: Chain, address: &str, token: &KnownToken) -> f64 {
        match self.rpc(chain).token_balance(address, token).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!(
                    chain = %chain,
                    token = token.symbol,
                    error = %e,
                    "Token balance fetch failed"
                );
                0.0
            }
        }
    }

    /// Scan `address` on `chain`.
    ///
    /// The native token always comes first; listed tokens with a positive
    /// balance follow, sorted by descending USD value.
    pub async fn scan(&self, chain: Chain, address: &str) -> Result<WalletReport, AppError> {
        if !chain.is_valid_address(address) {
            return Err(AppError::BadRequest(format!(
                "Invalid {} address",
                chain.config().name
            )));
        }

        let config = chain.config();
        let started = Instant::now();
        tracing::info!(chain = %chain, address, "Scanning wallet");

        let native_balance = self.native_balance_or_zero(chain, address).await;
        let native_price = self.coin_price(config.coingecko_id).await;
        let native = Token::native(
            config.native_symbol,
            config.native_name,
            config.native_decimals,
            native_balance,
            native_price,
        );

        let delay = self.scan_delay(chain);
        let mut listed = Vec::new();
        for known in config.known_tokens {
            let balance = self.token_balance_or_zero(chain, address, known).await;
            if balance > 0.0 {
                let price = self.coin_price(known.coingecko_id).await;
                let token = Token::listed(known, balance, price);
                tracing::debug!(
                    chain = %chain,
                    token = known.symbol,
                    balance,
                    value = token.value,
                    "Token found"
                );
                listed.push(token);
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        listed.sort_by(|a, b| b.value.total_cmp(&a.value));

        let mut tokens = Vec::with_capacity(listed.len() + 1);
        tokens.push(native);
        tokens.extend(listed);

        let total_value: f64 = tokens.iter().map(|t| t.value).sum();
        let processing_time_seconds = (started.elapsed().as_secs_f64() * 10.0).round() / 10.0;

        tracing::info!(
            chain = %chain,
            address,
            total_value,
            tokens = tokens.len(),
            seconds = processing_time_seconds,
            "Wallet scan complete"
        );

        Ok(WalletReport {
            statistics: ScanStatistics {
                tokens_checked: config.known_tokens.len(),
                tokens_found: tokens.len(),
                tokens_returned: tokens.len(),
                processing_time_seconds,
                average_token_value: total_value / tokens.len() as f64,
                largest_holding: tokens.first().cloned(),
                strategy: SCAN_STRATEGY,
                native_first: true,
            },
            tokens,
            address: address.to_string(),
            total_value,
            chain,
            fetched_at: now_rfc3339(),
            cache_info: CacheInfo {
                price_cache_size: self.coin_prices.len(),
            },
        })
    }

    /// Native balance only, without the token sweep.
    pub async fn summary(&self, chain: Chain, address: &str) -> Result<WalletSummary, AppError> {
        if !chain.is_valid_address(address) {
            return Err(AppError::BadRequest(format!(
                "Invalid {} address",
                chain.config().name
            )));
        }

        let config = chain.config();
        let balance = self.native_balance_or_zero(chain, address).await;

        Ok(WalletSummary {
            address: address.to_string(),
            chain,
            native_symbol: config.native_symbol,
            native_balance: format!("{:.6}", balance),
            estimated_scan_time: config.estimated_scan_time,
            known_tokens_to_check: config.known_tokens.len(),
            strategy: "streamlined",
            fetched_at: now_rfc3339(),
        })
    }

    /// Check that CoinGecko prices the chain's native asset.
    pub async fn test_price_api(&self, chain: Chain) -> PriceApiCheck {
        let config = chain.config();
        let price = self.coin_price(config.coingecko_id).await;

        if price > 0.0 {
            PriceApiCheck {
                status: "success",
                test_price: Some(price),
                message: format!(
                    "CoinGecko API working! {} price: ${}",
                    config.native_symbol, price
                ),
                timestamp: now_rfc3339(),
            }
        } else {
            PriceApiCheck {
                status: "failed",
                test_price: None,
                message: "CoinGecko API test failed: no price data returned".to_string(),
                timestamp: now_rfc3339(),
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.coin_prices.stats()
    }

    pub fn clear_caches(&self) -> usize {
        self.coin_prices.clear()
    }

    pub fn purge_stale(&self) -> usize {
        self.coin_prices.purge_stale()
    }
}
