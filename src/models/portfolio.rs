// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Client-supplied wallets for portfolio valuation.
//!
//! The frontend posts wallets exactly as it stores them, so unknown fields are
//! carried through untouched via `#[serde(flatten)]`.

use crate::models::price::RateTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A holding as stored by the frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Number or numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HoldingInput {
    /// Parsed balance; anything unparseable counts as zero.
    pub fn balance_amount(&self) -> f64 {
        match &self.balance {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => leading_number(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Longest numeric prefix of `s`, so `"1.5 ETH"` reads as 1.5.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
        .unwrap_or(s.len());
    (1..=end)
        .rev()
        .find_map(|len| s[..len].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// A wallet as stored by the frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletInput {
    #[serde(default)]
    pub tokens: Vec<HoldingInput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /api/prices/portfolio/calculate`.
#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub wallets: Option<Vec<WalletInput>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedHolding {
    #[serde(flatten)]
    pub holding: HoldingInput,
    pub price: f64,
    pub value: f64,
    pub change24h: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedWallet {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub tokens: Vec<PricedHolding>,
    pub total_value: f64,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub wallets: Vec<PricedWallet>,
    pub total_value: f64,
    pub wallet_count: usize,
    pub cross_rates: RateTable,
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_parsing() {
        let parse = |v: Value| HoldingInput {
            balance: Some(v),
            ..Default::default()
        }
        .balance_amount();

        assert_eq!(parse(Value::from(1.5)), 1.5);
        assert_eq!(parse(Value::from("2.25")), 2.25);
        assert_eq!(parse(Value::from("not a number")), 0.0);
        assert_eq!(parse(Value::from("1.5 ETH")), 1.5);
        assert_eq!(parse(Value::from("  42abc")), 42.0);
        assert_eq!(parse(Value::from("3e2 units")), 300.0);
        assert_eq!(parse(Value::from("2.5e")), 2.5);
        assert_eq!(parse(Value::from("-")), 0.0);
        assert_eq!(parse(Value::Null), 0.0);
        assert_eq!(HoldingInput::default().balance_amount(), 0.0);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let wallet: WalletInput = serde_json::from_str(
            r#"{"address":"0xabc","chain":"ethereum","tokens":[{"symbol":"ETH","balance":"1","logoURI":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(wallet.extra["chain"], "ethereum");
        assert_eq!(wallet.tokens[0].extra["logoURI"], "x");
    }
}
