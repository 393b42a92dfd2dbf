// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-rates between USD, ETH, SOL and BTC, plus value conversion/formatting.

use crate::models::price::{PriceMap, RateTable};
use std::collections::BTreeMap;

/// CoinGecko ids whose USD prices anchor the cross-rate table.
pub const RATE_BASE_COINS: [&str; 3] = ["bitcoin", "ethereum", "solana"];

/// Build `rates[from][to]` for usd/eth/sol/btc from USD spot prices.
///
/// Returns an empty table unless all three base prices are present and
/// non-zero.
pub fn calculate_rates(prices: &PriceMap) -> RateTable {
    let usd_price = |coin: &str| {
        prices
            .get(coin)
            .and_then(|quote| quote.usd())
            .filter(|price| *price > 0.0)
    };

    let (Some(btc), Some(eth), Some(sol)) = (
        usd_price("bitcoin"),
        usd_price("ethereum"),
        usd_price("solana"),
    ) else {
        return RateTable::new();
    };

    let bases = [("usd", 1.0), ("eth", eth), ("sol", sol), ("btc", btc)];
    bases
        .iter()
        .map(|&(from, from_usd)| {
            let row: BTreeMap<String, f64> = bases
                .iter()
                .filter(|(to, _)| *to != from)
                .map(|&(to, to_usd)| (to.to_string(), from_usd / to_usd))
                .collect();
            (from.to_string(), row)
        })
        .collect()
}

/// Convert `value` from one currency to another using `rates`.
///
/// A missing rate leaves the value unchanged.
pub fn convert(value: f64, from: &str, to: &str, rates: &RateTable) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let (from, to) = (from.to_ascii_lowercase(), to.to_ascii_lowercase());
    if from == to {
        return value;
    }

    match rates.get(&from).and_then(|row| row.get(&to)) {
        Some(rate) => value * rate,
        None => {
            tracing::warn!(from = %from, to = %to, "Missing conversion rate");
            value
        }
    }
}

/// Display a value in the given currency.
///
/// Fiat-like currencies get two decimals and a `$`, BTC six decimals,
/// everything else four decimals followed by the ticker.
pub fn format_currency(value: f64, currency: &str) -> String {
    let currency = currency.to_ascii_lowercase();
    let value = if value.is_finite() { value } else { 0.0 };
    match currency.as_str() {
        "usd" | "usdc" | "usdt" => format!("${}", group_thousands(&format!("{:.2}", value))),
        "btc" => format!("{} BTC", group_thousands(&format!("{:.6}", value))),
        other => format!(
            "{} {}",
            group_thousands(&format!("{:.4}", value)),
            other.to_uppercase()
        ),
    }
}

/// Insert `,` separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
