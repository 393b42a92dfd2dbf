// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Scanned wallet reports.

use crate::chains::Chain;
use crate::models::Token;
use serde::Serialize;

/// Result of scanning one wallet on one chain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletReport {
    /// Native token first, then listed tokens by descending value
    pub tokens: Vec<Token>,
    pub address: String,
    pub total_value: f64,
    pub chain: Chain,
    pub statistics: ScanStatistics,
    pub fetched_at: String,
    pub cache_info: CacheInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    pub tokens_checked: usize,
    /// Tokens with a balance, including the native asset
    pub tokens_found: usize,
    pub tokens_returned: usize,
    pub processing_time_seconds: f64,
    pub average_token_value: f64,
    pub largest_holding: Option<Token>,
    pub strategy: &'static str,
    pub native_first: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub price_cache_size: usize,
}

/// Lightweight wallet overview (native balance only).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub address: String,
    pub chain: Chain,
    pub native_symbol: &'static str,
    pub native_balance: String,
    pub estimated_scan_time: &'static str,
    pub known_tokens_to_check: usize,
    pub strategy: &'static str,
    pub fetched_at: String,
}
