// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CoinGecko market data client.
//!
//! Handles:
//! - Spot prices with 24h change / market cap (`/simple/price`)
//! - Top coins by market cap (`/coins/markets`)
//! - Rate limit detection (429)

use crate::error::AppError;
use crate::models::price::{MarketCoin, PriceMap};
use serde::Deserialize;
use std::time::Duration;

const SIMPLE_PRICE_TIMEOUT: Duration = Duration::from_secs(10);
const MARKETS_TIMEOUT: Duration = Duration::from_secs(15);
const API_KEY_HEADER: &str = "X-CG-Demo-API-Key";

/// CoinGecko API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a client for `base_url` (e.g. `https://api.coingecko.com/api/v3`).
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch spot prices for `ids` in each of `vs_currencies`.
    ///
    /// Coins CoinGecko doesn't know are simply absent from the result.
    pub async fn simple_price(
        &self,
        ids: &[String],
        vs_currencies: &[String],
    ) -> Result<PriceMap, AppError> {
        if ids.is_empty() {
            return Ok(PriceMap::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let prices: PriceMap = self
            .get_json(
                &url,
                &[
                    ("ids", ids.join(",")),
                    ("vs_currencies", vs_currencies.join(",")),
                    ("include_24hr_change", "true".to_string()),
                    ("include_market_cap", "true".to_string()),
                    ("include_last_updated_at", "true".to_string()),
                ],
                SIMPLE_PRICE_TIMEOUT,
            )
            .await?;

        tracing::debug!(coins = %ids.join(","), returned = prices.len(), "Fetched prices");
        Ok(prices)
    }

    /// USD price of a single coin, if CoinGecko returned one.
    pub async fn usd_price(&self, coin_id: &str) -> Result<Option<f64>, AppError> {
        let prices = self
            .simple_price(&[coin_id.to_string()], &["usd".to_string()])
            .await?;
        Ok(prices.get(coin_id).and_then(|quote| quote.usd()))
    }

    /// Top `limit` coins by market cap, priced in USD.
    pub async fn markets_top(&self, limit: u32) -> Result<Vec<MarketCoin>, AppError> {
        let url = format!("{}/coins/markets", self.base_url);
        let coins: Vec<MarketCoin> = self
            .get_json(
                &url,
                &[
                    ("vs_currency", "usd".to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", limit.to_string()),
                    ("page", "1".to_string()),
                    ("sparkline", "false".to_string()),
                    ("price_change_percentage", "24h".to_string()),
                ],
                MARKETS_TIMEOUT,
            )
            .await?;

        tracing::debug!(count = coins.len(), "Fetched top coins");
        Ok(coins)
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, AppError> {
        let mut request = self.http.get(url).query(query).timeout(timeout);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("CoinGecko request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("CoinGecko rate limit hit (429)");
                return Err(AppError::Upstream(AppError::RATE_LIMITED.to_string()));
            }

            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}
