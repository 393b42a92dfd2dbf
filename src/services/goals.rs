// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Holding targets per currency and progress towards them.

use crate::models::WalletInput;
use serde::Serialize;
use std::collections::BTreeMap;

/// Currencies that can carry a goal, in display order.
pub const GOAL_CURRENCIES: [&str; 6] = ["eth", "sol", "bnb", "usdc", "usdt", "dai"];

/// Progress towards one currency goal.
#[derive(Debug, Clone, Serialize)]
pub struct GoalStatus {
    pub currency: &'static str,
    pub current: f64,
    pub goal: f64,
    pub progress: f64,
    pub achieved: bool,
    pub remaining: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSummary {
    pub active_goals: usize,
    pub achieved_goals: usize,
    pub average_progress: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalsReport {
    pub holdings: BTreeMap<&'static str, f64>,
    pub goals: Vec<GoalStatus>,
    pub summary: GoalsSummary,
}

/// Goal bucket for a token symbol; wrapped assets count as the native coin.
fn bucket(symbol: &str) -> Option<&'static str> {
    match symbol.trim().to_ascii_lowercase().as_str() {
        "eth" | "weth" => Some("eth"),
        "sol" | "wsol" => Some("sol"),
        "bnb" | "wbnb" => Some("bnb"),
        "usdc" => Some("usdc"),
        "usdt" => Some("usdt"),
        "dai" => Some("dai"),
        _ => None,
    }
}

/// Sum token balances across wallets into the goal currencies.
pub fn aggregate_holdings(wallets: &[WalletInput]) -> BTreeMap<&'static str, f64> {
    let mut holdings: BTreeMap<&'static str, f64> =
        GOAL_CURRENCIES.iter().map(|c| (*c, 0.0)).collect();

    for token in wallets.iter().flat_map(|w| w.tokens.iter()) {
        if let Some(currency) = token.symbol.as_deref().and_then(bucket) {
            *holdings.entry(currency).or_default() += token.balance_amount();
        }
    }
    holdings
}

/// Percentage of `goal` reached, capped at 100.
pub fn progress(current: f64, goal: f64) -> f64 {
    if goal.is_nan() || goal <= 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).min(100.0)
}

/// Evaluate `goals` (currency → target amount) against the wallets' holdings.
///
/// Goals for unknown currencies or with a non-positive target are skipped.
pub fn evaluate(wallets: &[WalletInput], goals: &BTreeMap<String, f64>) -> GoalsReport {
    let holdings = aggregate_holdings(wallets);

    let statuses: Vec<GoalStatus> = GOAL_CURRENCIES
        .iter()
        .filter_map(|&currency| {
            let goal = goals
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(currency))
                .map(|(_, v)| *v)
                .filter(|g| *g > 0.0)?;
            let current = holdings.get(currency).copied().unwrap_or(0.0);
            let progress = progress(current, goal);
            Some(GoalStatus {
                currency,
                current,
                goal,
                progress,
                achieved: progress >= 100.0,
                remaining: (goal - current).max(0.0),
            })
        })
        .collect();

    let mut summary = GoalsSummary {
        active_goals: statuses.len(),
        achieved_goals: statuses.iter().filter(|s| s.achieved).count(),
        average_progress: 0.0,
    };
    if !statuses.is_empty() {
        summary.average_progress =
            statuses.iter().map(|s| s.progress).sum::<f64>() / statuses.len() as f64;
    }

    GoalsReport {
        holdings,
        goals: statuses,
        summary,
    }
}
