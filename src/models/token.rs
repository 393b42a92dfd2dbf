// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Token holdings as returned by the wallet scanner.

use crate::chains::KnownToken;
use serde::{Deserialize, Serialize};

/// Address placeholder used for a chain's native asset.
pub const NATIVE_ADDRESS: &str = "native";

/// Where a token entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenSource {
    /// The chain's base currency
    Native,
    /// A token from the chain's known token list
    CoingeckoListed,
}

/// A single holding in a scanned wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: String,
    pub name: String,
    /// Balance formatted with the token's decimals
    pub balance: String,
    pub decimals: u8,
    /// Contract/mint address, or `"native"`
    pub address: String,
    /// USD price per unit
    pub price: f64,
    pub mint: String,
    pub verified: bool,
    /// USD value of the balance
    pub value: f64,
    pub source: TokenSource,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
}

impl Token {
    /// Build the native-asset entry for a wallet.
    pub fn native(
        symbol: &str,
        name: &str,
        decimals: u8,
        balance: f64,
        price: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            balance: format_balance(balance, decimals),
            decimals,
            address: NATIVE_ADDRESS.to_string(),
            price,
            mint: NATIVE_ADDRESS.to_string(),
            verified: true,
            value: balance * price,
            source: TokenSource::Native,
            logo_uri: None,
            coingecko_id: None,
        }
    }

    /// Build an entry for a known token with a non-zero balance.
    pub fn listed(known: &KnownToken, balance: f64, price: f64) -> Self {
        Self {
            symbol: known.symbol.to_string(),
            name: known.name.to_string(),
            balance: format_balance(balance, known.decimals),
            decimals: known.decimals,
            address: known.address.to_string(),
            price,
            mint: known.address.to_string(),
            verified: true,
            value: balance * price,
            source: TokenSource::CoingeckoListed,
            logo_uri: Some(known.logo_uri.to_string()),
            coingecko_id: Some(known.coingecko_id.to_string()),
        }
    }

    pub fn is_native(&self) -> bool {
        self.source == TokenSource::Native
    }
}

/// Balances are shown with the token's precision, capped at 9 places.
fn format_balance(balance: f64, decimals: u8) -> String {
    let precision = if decimals >= 9 { 9 } else { decimals as usize };
    format!("{:.*}", precision, balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::Chain;

    #[test]
    fn test_native_token_value() {
        let token = Token::native("ETH", "Ethereum", 18, 1.5, 2000.0);
        assert_eq!(token.balance, "1.500000000");
        assert_eq!(token.value, 3000.0);
        assert!(token.is_native());
        assert_eq!(token.address, NATIVE_ADDRESS);
    }

    #[test]
    fn test_listed_token_uses_known_metadata() {
        let usdc = &Chain::Ethereum.known_tokens()[1];
        let token = Token::listed(usdc, 12.5, 1.0);
        assert_eq!(token.symbol, "USDC");
        assert_eq!(token.balance, "12.500000");
        assert_eq!(token.coingecko_id.as_deref(), Some("usd-coin"));

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["source"], "coingecko-listed");
        assert!(json["logoURI"].is_string());
    }
}
