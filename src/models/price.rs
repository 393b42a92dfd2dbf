// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Market data shapes: per-coin quotes, cross-rates and ticker entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields returned by `/simple/price` for one coin, e.g. `usd`,
/// `usd_24h_change`, `usd_market_cap`, `last_updated_at`.
///
/// Upstream sends `null` for unknown values, hence the `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinQuote(pub BTreeMap<String, Option<f64>>);

impl CoinQuote {
    pub fn field(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied().flatten()
    }

    pub fn usd(&self) -> Option<f64> {
        self.field("usd")
    }

    pub fn usd_24h_change(&self) -> Option<f64> {
        self.field("usd_24h_change")
    }

    /// Quote with only a USD price (used for fixtures and fallbacks).
    pub fn from_usd(price: f64) -> Self {
        Self(BTreeMap::from([("usd".to_string(), Some(price))]))
    }
}

/// Quotes keyed by CoinGecko coin id (or by requested symbol).
pub type PriceMap = BTreeMap<String, CoinQuote>;

/// `rates[from][to]`: units of `to` per one unit of `from`.
pub type RateTable = BTreeMap<String, BTreeMap<String, f64>>;

/// One row of `/coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub image: Option<String>,
}

/// Ticker/top-coin entry served to the frontend.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickerEntry {
    pub id: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: f64,
    pub change: f64,
    pub change_text: String,
    pub positive: bool,
    pub market_cap: f64,
    pub rank: Option<u32>,
    pub image: String,
}

impl TickerEntry {
    pub fn new(id: &str, symbol: &str, name: Option<&str>, price: f64, change: f64) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_uppercase(),
            name: name.map(str::to_string),
            price,
            change,
            change_text: format_change(change),
            positive: change >= 0.0,
            market_cap: 0.0,
            rank: None,
            image: String::new(),
        }
    }
}

impl From<MarketCoin> for TickerEntry {
    fn from(coin: MarketCoin) -> Self {
        let change = coin.price_change_percentage_24h.unwrap_or(0.0);
        Self {
            market_cap: coin.market_cap.unwrap_or(0.0),
            rank: coin.market_cap_rank,
            image: coin.image.unwrap_or_default(),
            ..TickerEntry::new(
                &coin.id,
                &coin.symbol,
                Some(&coin.name),
                coin.current_price.unwrap_or(0.0),
                change,
            )
        }
    }
}

/// Percentage change with one decimal and an explicit `+` for gains.
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.1}%", change)
    } else {
        format!("{:.1}%", change)
    }
}
