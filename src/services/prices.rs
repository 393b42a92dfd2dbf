// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cached price lookups, cross-rates, top coins and ticker data.
//!
//! Every upstream call goes through a TTL cache. The top-10 and ticker
//! endpoints never fail: they fall back to static example data.

use crate::cache::{CacheStats, TtlCache};
use crate::error::AppError;
use crate::models::price::{PriceMap, RateTable, TickerEntry};
use crate::services::coingecko::CoinGeckoClient;
use crate::services::currency::{calculate_rates, RATE_BASE_COINS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// TTL for price quotes and top coins.
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(2 * 60);
/// TTL for the cross-rate table.
pub const RATES_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

const TOP_COINS_LIMIT: u32 = 10;
const RATES_KEY: &str = "rates";
const TOP_COINS_KEY: &str = "top10_coins";

/// Symbol → CoinGecko id. Unlisted symbols are used as ids verbatim.
const COIN_MAP: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("sol", "solana"),
    ("matic", "matic-network"),
    ("bnb", "binancecoin"),
    ("usdc", "usd-coin"),
    ("usdt", "tether"),
    ("dai", "dai"),
    ("uni", "uniswap"),
    ("link", "chainlink"),
    ("shib", "shiba-inu"),
];

/// Coins shown by the ticker when the markets endpoint is unavailable.
const TICKER_COINS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("matic-network", "MATIC"),
    ("uniswap", "UNI"),
    ("chainlink", "LINK"),
];

/// (symbol, name, price, 24h change)
const FALLBACK_TOP_COINS: &[(&str, &str, f64, f64)] = &[
    ("BTC", "Bitcoin", 43500.0, 2.4),
    ("ETH", "Ethereum", 2300.0, -1.2),
    ("USDT", "Tether", 1.00, 0.1),
    ("BNB", "BNB", 300.0, 3.1),
    ("SOL", "Solana", 90.0, 5.2),
    ("USDC", "USD Coin", 1.00, 0.0),
    ("XRP", "XRP", 0.60, 1.8),
    ("ADA", "Cardano", 0.45, -0.5),
    ("AVAX", "Avalanche", 35.0, 2.1),
    ("DOGE", "Dogecoin", 0.08, 4.2),
];

/// (symbol, price, 24h change)
const FALLBACK_TICKER: &[(&str, f64, f64)] = &[
    ("BTC", 43500.0, 2.4),
    ("ETH", 2300.0, -1.2),
    ("SOL", 90.0, 5.2),
    ("MATIC", 0.80, 1.8),
    ("UNI", 12.0, -0.5),
    ("LINK", 15.0, 3.1),
];

/// Map a ticker symbol (any case) to its CoinGecko id.
pub fn coin_id_for_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_ascii_lowercase();
    COIN_MAP
        .iter()
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, id)| id.to_string())
        .unwrap_or(symbol)
}

/// Whether `symbol` has an explicit CoinGecko mapping.
pub fn is_mapped_symbol(symbol: &str) -> bool {
    let symbol = symbol.trim().to_ascii_lowercase();
    COIN_MAP.iter().any(|(sym, _)| *sym == symbol)
}

/// Top coins plus where they came from.
#[derive(Debug, Clone, Serialize)]
pub struct TopCoins {
    pub coins: Vec<TickerEntry>,
    pub source: &'static str,
    pub cached: bool,
    pub error: Option<String>,
}

/// Ticker entries plus where they came from.
#[derive(Debug, Clone, Serialize)]
pub struct Ticker {
    pub entries: Vec<TickerEntry>,
    pub source: &'static str,
    pub error: Option<String>,
}

/// Per-coin result of the connectivity self-test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinCheck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change24h: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityReport {
    pub coingecko_api: &'static str,
    pub top10_endpoint: String,
    pub api_key: &'static str,
    pub test_results: BTreeMap<String, CoinCheck>,
    pub cache_size: usize,
}

/// Price service backed by CoinGecko with TTL caching.
#[derive(Clone)]
pub struct PriceService {
    client: CoinGeckoClient,
    quotes: TtlCache<String, PriceMap>,
    rates: TtlCache<&'static str, RateTable>,
    top_coins: TtlCache<&'static str, Vec<TickerEntry>>,
}

impl PriceService {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self {
            client,
            quotes: TtlCache::new(PRICE_CACHE_TTL),
            rates: TtlCache::new(RATES_CACHE_TTL),
            top_coins: TtlCache::new(PRICE_CACHE_TTL),
        }
    }

    pub fn client(&self) -> &CoinGeckoClient {
        &self.client
    }

    /// Quotes for the requested symbols, keyed by the symbol as requested.
    ///
    /// Symbols CoinGecko doesn't know are left out. The boolean reports a
    /// cache hit.
    pub async fn prices_for_symbols(
        &self,
        symbols: &[String],
    ) -> Result<(PriceMap, bool), AppError> {
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if symbols.is_empty() {
            return Err(AppError::BadRequest("At least one symbol is required".to_string()));
        }

        let coin_ids: Vec<String> = symbols.iter().map(|s| coin_id_for_symbol(s)).collect();
        let key = format!("symbols_{}", symbols.join(","));
        let usd = ["usd".to_string()];

        let (prices, cached) = self
            .quotes
            .get_or_try_insert_with(key, || self.client.simple_price(&coin_ids, &usd))
            .await?;

        let by_symbol = symbols
            .iter()
            .zip(&coin_ids)
            .filter_map(|(symbol, id)| prices.get(id).map(|q| (symbol.clone(), q.clone())))
            .collect();

        Ok((by_symbol, cached))
    }

    /// Quotes for arbitrary coins/currencies, plus the derived cross-rates.
    ///
    /// A non-empty cross-rate table also refreshes the cached `rates` entry.
    pub async fn realtime(
        &self,
        coins: &[String],
        currencies: &[String],
    ) -> Result<(PriceMap, RateTable), AppError> {
        let coin_ids: Vec<String> = coins.iter().map(|c| coin_id_for_symbol(c)).collect();
        let currencies: Vec<String> = currencies
            .iter()
            .map(|c| c.trim().to_ascii_lowercase())
            .collect();
        let key = format!("realtime_{}_{}", coin_ids.join(","), currencies.join(","));

        let (prices, _) = self
            .quotes
            .get_or_try_insert_with(key, || self.client.simple_price(&coin_ids, &currencies))
            .await?;

        let cross_rates = calculate_rates(&prices);
        if !cross_rates.is_empty() {
            self.rates.insert(RATES_KEY, cross_rates.clone());
        }

        Ok((prices, cross_rates))
    }

    /// Cross-rate table between usd/eth/sol/btc.
    pub async fn rates(&self) -> Result<(RateTable, bool), AppError> {
        self.rates
            .get_or_try_insert_with(RATES_KEY, move || async move {
                let ids: Vec<String> = RATE_BASE_COINS.iter().map(|c| c.to_string()).collect();
                let prices = self.client.simple_price(&ids, &["usd".to_string()]).await?;
                let rates = calculate_rates(&prices);
                if rates.is_empty() {
                    return Err(AppError::Upstream(
                        "Missing base prices for cross-rates".to_string(),
                    ));
                }
                Ok(rates)
            })
            .await
    }

    /// Fetch uncached USD quotes for a set of coin ids.
    pub async fn quotes_for_ids(&self, coin_ids: &[String]) -> Result<PriceMap, AppError> {
        self.client.simple_price(coin_ids, &["usd".to_string()]).await
    }

    /// Top coins by market cap, or static fallback data on upstream failure.
    pub async fn top10(&self) -> TopCoins {
        let fetched = self
            .top_coins
            .get_or_try_insert_with(TOP_COINS_KEY, move || async move {
                let coins = self.client.markets_top(TOP_COINS_LIMIT).await?;
                Ok::<_, AppError>(coins.into_iter().map(TickerEntry::from).collect())
            })
            .await;

        match fetched {
            Ok((coins, cached)) => TopCoins {
                coins,
                source: "CoinGecko Markets API",
                cached,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Top coins fetch failed, using fallback data");
                TopCoins {
                    coins: fallback_top_coins(),
                    source: "fallback_data",
                    cached: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Ticker data: live top coins, then simple prices, then static data.
    pub async fn ticker(&self) -> Ticker {
        let top = self.top10().await;
        if top.error.is_none() && !top.coins.is_empty() {
            return Ticker {
                entries: top.coins,
                source: "top10_live",
                error: None,
            };
        }

        tracing::info!("Using fallback ticker method");
        let coin_ids: Vec<String> = TICKER_COINS.iter().map(|(id, _)| id.to_string()).collect();
        let usd = ["usd".to_string()];
        let fetched = self
            .quotes
            .get_or_try_insert_with("ticker_fallback".to_string(), || {
                self.client.simple_price(&coin_ids, &usd)
            })
            .await;

        match fetched {
            Ok((prices, _)) => {
                let entries = TICKER_COINS
                    .iter()
                    .filter_map(|(id, symbol)| {
                        prices.get(*id).map(|quote| {
                            TickerEntry::new(
                                id,
                                symbol,
                                None,
                                quote.usd().unwrap_or(0.0),
                                quote.usd_24h_change().unwrap_or(0.0),
                            )
                        })
                    })
                    .collect();
                Ticker {
                    entries,
                    source: "fallback_coins",
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ticker fallback failed, using static data");
                Ticker {
                    entries: FALLBACK_TICKER
                        .iter()
                        .map(|&(symbol, price, change)| {
                            TickerEntry::new(&symbol.to_lowercase(), symbol, None, price, change)
                        })
                        .collect(),
                    source: "ultimate_fallback",
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Probe simple-price for BTC/ETH/SOL and the markets endpoint.
    pub async fn connectivity(&self) -> Result<ConnectivityReport, AppError> {
        let ids: Vec<String> = RATE_BASE_COINS.iter().map(|c| c.to_string()).collect();
        let prices = self.client.simple_price(&ids, &["usd".to_string()]).await?;

        let test_results = ids
            .iter()
            .map(|id| {
                let check = match prices.get(id) {
                    Some(quote) => CoinCheck {
                        status: "working",
                        price: quote.usd(),
                        change24h: quote.usd_24h_change(),
                    },
                    None => CoinCheck {
                        status: "no_data",
                        price: None,
                        change24h: None,
                    },
                };
                (id.clone(), check)
            })
            .collect();

        let top10_endpoint = match self.client.markets_top(TOP_COINS_LIMIT).await {
            Ok(_) => "working".to_string(),
            Err(e) => format!("failed: {}", e),
        };

        Ok(ConnectivityReport {
            coingecko_api: "connected",
            top10_endpoint,
            api_key: if self.client.has_api_key() {
                "configured"
            } else {
                "missing"
            },
            test_results,
            cache_size: self.size(),
        })
    }

    /// Total entries across all price caches.
    pub fn size(&self) -> usize {
        self.quotes.len() + self.rates.len() + self.top_coins.len()
    }

    /// Drop every cached price, rate and top-coin entry.
    pub fn clear(&self) -> usize {
        self.quotes.clear() + self.rates.clear() + self.top_coins.clear()
    }

    pub fn purge_stale(&self) -> usize {
        self.quotes.purge_stale() + self.rates.purge_stale() + self.top_coins.purge_stale()
    }

    pub fn stats(&self) -> BTreeMap<&'static str, CacheStats> {
        BTreeMap::from([
            ("quotes", self.quotes.stats()),
            ("rates", self.rates.stats()),
            ("topCoins", self.top_coins.stats()),
        ])
    }
}

fn fallback_top_coins() -> Vec<TickerEntry> {
    FALLBACK_TOP_COINS
        .iter()
        .enumerate()
        .map(|(index, &(symbol, name, price, change))| TickerEntry {
            rank: Some(index as u32 + 1),
            ..TickerEntry::new(&symbol.to_lowercase(), symbol, Some(name), price, change)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn service(server: &MockServer) -> PriceService {
        PriceService::new(CoinGeckoClient::new(
            reqwest::Client::new(),
            server.base_url(),
            None,
        ))
    }

    #[test]
    fn test_coin_id_mapping() {
        assert_eq!(coin_id_for_symbol("ETH"), "ethereum");
        assert_eq!(coin_id_for_symbol("matic"), "matic-network");
        assert_eq!(coin_id_for_symbol("Pepe"), "pepe");
        assert!(is_mapped_symbol("Link"));
        assert!(!is_mapped_symbol("pepe"));
    }

    #[test]
    fn test_fallback_top_coins_are_ranked() {
        let coins = fallback_top_coins();
        assert_eq!(coins.len(), 10);
        assert_eq!(coins[0].symbol, "BTC");
        assert_eq!(coins[0].rank, Some(1));
        assert_eq!(coins[9].rank, Some(10));
        assert_eq!(coins[1].change_text, "-1.2%");
    }

    #[tokio::test]
    async fn test_symbol_prices_are_keyed_by_symbol_and_cached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/simple/price")
                    .query_param("ids", "ethereum,pepe");
                then.status(200)
                    .json_body(json!({"ethereum": {"usd": 2300.0}}));
            })
            .await;

        let svc = service(&server);
        let symbols = vec!["ETH".to_string(), "pepe".to_string()];

        let (prices, cached) = svc.prices_for_symbols(&symbols).await.unwrap();
        assert!(!cached);
        assert_eq!(prices["eth"].usd(), Some(2300.0));
        assert!(!prices.contains_key("pepe"));

        let (_, cached) = svc.prices_for_symbols(&symbols).await.unwrap();
        assert!(cached);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_realtime_refreshes_rates() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).json_body(json!({
                    "bitcoin": {"usd": 50000.0},
                    "ethereum": {"usd": 2500.0},
                    "solana": {"usd": 25.0}
                }));
            })
            .await;

        let svc = service(&server);
        let coins = vec!["btc".to_string(), "eth".to_string(), "sol".to_string()];
        let (_, cross) = svc.realtime(&coins, &["usd".to_string()]).await.unwrap();
        assert_eq!(cross["eth"]["sol"], 100.0);

        // Served from the rates cache populated above
        let (rates, cached) = svc.rates().await.unwrap();
        assert!(cached);
        assert_eq!(rates, cross);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_top10_falls_back_on_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/markets");
                then.status(503);
            })
            .await;

        let top = service(&server).top10().await;
        assert_eq!(top.source, "fallback_data");
        assert_eq!(top.coins.len(), 10);
        assert!(top.error.is_some());
    }

    #[tokio::test]
    async fn test_ticker_uses_static_data_when_everything_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.any_request();
                then.status(500);
            })
            .await;

        let svc = service(&server);
        let ticker = svc.ticker().await;
        assert_eq!(ticker.source, "ultimate_fallback");
        assert_eq!(ticker.entries.len(), 6);
        assert_eq!(ticker.entries[3].symbol, "MATIC");
        // Failures are never cached
        assert_eq!(svc.size(), 0);
    }

    #[tokio::test]
    async fn test_ticker_prefers_live_top_coins() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/coins/markets");
                then.status(200).json_body(json!([{
                    "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
                    "current_price": 61000.0, "price_change_percentage_24h": 1.5,
                    "market_cap": 1.2e12, "market_cap_rank": 1, "image": "btc.png"
                }]));
            })
            .await;

        let ticker = service(&server).ticker().await;
        assert_eq!(ticker.source, "top10_live");
        assert_eq!(ticker.entries[0].price, 61000.0);
        assert_eq!(ticker.entries[0].change_text, "+1.5%");
    }

    #[tokio::test]
    async fn test_clear_reports_entries_removed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/simple/price");
                then.status(200).json_body(json!({"bitcoin": {"usd": 1.0}}));
            })
            .await;

        let svc = service(&server);
        svc.prices_for_symbols(&["btc".to_string()]).await.unwrap();
        svc.prices_for_symbols(&["eth".to_string()]).await.unwrap();
        assert_eq!(svc.clear(), 2);
        assert_eq!(svc.size(), 0);
    }
}
