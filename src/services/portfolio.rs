// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio valuation for client-held wallets.

use crate::error::AppError;
use crate::models::portfolio::{PricedHolding, PricedWallet};
use crate::models::price::PriceMap;
use crate::models::{HoldingInput, PortfolioValuation, WalletInput};
use crate::services::currency::calculate_rates;
use crate::services::prices::{coin_id_for_symbol, is_mapped_symbol, PriceService};
use crate::time_utils::now_rfc3339;
use std::collections::BTreeSet;

/// Fields recomputed on every valuation; stale client copies are dropped.
const DERIVED_FIELDS: [&str; 3] = ["price", "value", "change24h"];
const WALLET_DERIVED_FIELDS: [&str; 2] = ["totalValue", "lastUpdated"];

/// CoinGecko id for a holding: mapped symbol first, then the client's id.
fn coin_id(holding: &HoldingInput) -> Option<String> {
    match holding.symbol.as_deref() {
        Some(symbol) if is_mapped_symbol(symbol) => Some(coin_id_for_symbol(symbol)),
        _ => holding
            .coingecko_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
    }
}

/// Value every holding in `wallets` against a single price fetch.
pub async fn calculate(
    prices: &PriceService,
    wallets: Vec<WalletInput>,
) -> Result<PortfolioValuation, AppError> {
    let coin_ids: BTreeSet<String> = wallets
        .iter()
        .flat_map(|wallet| wallet.tokens.iter())
        .filter_map(coin_id)
        .collect();
    let coin_ids: Vec<String> = coin_ids.into_iter().collect();

    let quotes = prices.quotes_for_ids(&coin_ids).await?;
    let valuation = value_wallets(wallets, &quotes);

    tracing::info!(
        wallets = valuation.wallet_count,
        coins = coin_ids.len(),
        total_value = valuation.total_value,
        "Portfolio calculated"
    );
    Ok(valuation)
}

/// Apply `quotes` to `wallets`. Holdings without a quote are worth 0.
pub fn value_wallets(wallets: Vec<WalletInput>, quotes: &PriceMap) -> PortfolioValuation {
    let last_updated = now_rfc3339();

    let priced: Vec<PricedWallet> = wallets
        .into_iter()
        .map(|wallet| {
            let mut extra = wallet.extra;
            for field in WALLET_DERIVED_FIELDS {
                extra.remove(field);
            }

            let tokens: Vec<PricedHolding> = wallet
                .tokens
                .into_iter()
                .map(|mut holding| {
                    let quote = coin_id(&holding).and_then(|id| quotes.get(&id));
                    let price = quote.and_then(|q| q.usd()).unwrap_or(0.0);
                    let change24h = quote.and_then(|q| q.usd_24h_change()).unwrap_or(0.0);
                    let value = holding.balance_amount() * price;
                    for field in DERIVED_FIELDS {
                        holding.extra.remove(field);
                    }
                    PricedHolding {
                        holding,
                        price,
                        value,
                        change24h,
                    }
                })
                .collect();

            PricedWallet {
                extra,
                total_value: tokens.iter().map(|t| t.value).sum(),
                tokens,
                last_updated: last_updated.clone(),
            }
        })
        .collect();

    PortfolioValuation {
        total_value: priced.iter().map(|w| w.total_value).sum(),
        wallet_count: priced.len(),
        cross_rates: calculate_rates(quotes),
        wallets: priced,
        last_updated,
    }
}
