// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet scanning routes, mounted under `/api/wallets`.

use crate::cache::CacheStats;
use crate::chains::{Chain, KnownToken};
use crate::error::{AppError, Result};
use crate::models::{Token, WalletReport, WalletSummary};
use crate::routes::ApiResponse;
use crate::services::scanner::PriceApiCheck;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add", post(add_wallet))
        .route("/cache/clear", delete(clear_cache))
        .route("/cache/stats", get(cache_stats))
        .route("/status/all", get(status_all))
        .route("/{chain}/tokens/list", get(list_tokens))
        .route("/{chain}/test/coingecko", get(test_coingecko))
        .route("/{chain}/status", get(chain_status))
        .route("/{chain}/{address}", get(get_wallet))
        .route("/{chain}/{address}/summary", get(get_summary))
}

fn parse_chain(chain: &str) -> Result<Chain> {
    chain
        .parse()
        .map_err(|e: crate::chains::UnknownChain| AppError::NotFound(e.to_string()))
}

/// Result of a chain's RPC liveness probe, as shown in status responses.
async fn rpc_status(state: &AppState, chain: Chain) -> String {
    match state.scanner.rpc(chain).probe().await {
        Ok(result) => result,
        Err(e) => format!("error: {}", e),
    }
}

// ─── Scanning ────────────────────────────────────────────────

async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path((chain, address)): Path<(String, String)>,
) -> Result<Json<ApiResponse<WalletReport>>> {
    let chain = parse_chain(&chain)?;
    let report = state.scanner.scan(chain, &address).await?;
    Ok(ApiResponse::ok(report))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path((chain, address)): Path<(String, String)>,
) -> Result<Json<ApiResponse<WalletSummary>>> {
    let chain = parse_chain(&chain)?;
    let summary = state.scanner.summary(chain, &address).await?;
    Ok(ApiResponse::ok(summary))
}

// ─── Chain Info ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenListResponse {
    message: String,
    chain: Chain,
    total_tokens: usize,
    tokens: &'static [KnownToken],
    strategy: &'static str,
    timestamp: String,
}

async fn list_tokens(Path(chain): Path<String>) -> Result<Json<ApiResponse<TokenListResponse>>> {
    let chain = parse_chain(&chain)?;
    let tokens = chain.known_tokens();
    Ok(ApiResponse::ok(TokenListResponse {
        message: format!("Known {} tokens", chain.config().name),
        chain,
        total_tokens: tokens.len(),
        tokens,
        strategy: "CoinGecko-listed tokens only",
        timestamp: now_rfc3339(),
    }))
}

async fn test_coingecko(
    State(state): State<Arc<AppState>>,
    Path(chain): Path<String>,
) -> Result<Json<ApiResponse<PriceApiCheck>>> {
    let chain = parse_chain(&chain)?;
    let check = state.scanner.test_price_api(chain).await;
    Ok(Json(ApiResponse {
        success: check.is_success(),
        data: check,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainStatusResponse {
    message: String,
    chain: Chain,
    strategy: String,
    tokens_checked: usize,
    estimated_scan_time: &'static str,
    api_status: ApiStatus,
    cache: CacheStats,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiStatus {
    coin_gecko: &'static str,
    rpc: String,
}

async fn chain_status(
    State(state): State<Arc<AppState>>,
    Path(chain): Path<String>,
) -> Result<Json<ApiResponse<ChainStatusResponse>>> {
    let chain = parse_chain(&chain)?;
    let config = chain.config();
    let check = state.scanner.test_price_api(chain).await;

    Ok(ApiResponse::ok(ChainStatusResponse {
        message: format!("{} system status", config.name),
        chain,
        strategy: format!("Native {} + CoinGecko-listed tokens only", config.native_symbol),
        tokens_checked: config.known_tokens.len(),
        estimated_scan_time: config.estimated_scan_time,
        api_status: ApiStatus {
            coin_gecko: check.status,
            rpc: rpc_status(&state, chain).await,
        },
        cache: state.scanner.cache_stats(),
        timestamp: now_rfc3339(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainOverview {
    api_status: &'static str,
    rpc: String,
    tokens_supported: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusAllResponse {
    message: &'static str,
    total_chains: usize,
    chains: BTreeMap<Chain, ChainOverview>,
    cache: CacheStats,
    timestamp: String,
}

async fn status_all(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatusAllResponse>> {
    let checks = Chain::ALL.iter().map(|&chain| {
        let state = state.clone();
        async move {
            let check = state.scanner.test_price_api(chain).await;
            let overview = ChainOverview {
                api_status: check.status,
                rpc: rpc_status(&state, chain).await,
                tokens_supported: chain.known_tokens().len(),
            };
            (chain, overview)
        }
    });
    let chains: BTreeMap<_, _> = join_all(checks).await.into_iter().collect();

    ApiResponse::ok(StatusAllResponse {
        message: "Multi-chain wallet system status",
        total_chains: chains.len(),
        chains,
        cache: state.scanner.cache_stats(),
        timestamp: now_rfc3339(),
    })
}

// ─── Wallet Addition ─────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct AddWalletRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Chain is required"))]
    pub chain: String,
    #[validate(length(max = 64))]
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddedWallet {
    address: String,
    chain: Chain,
    name: String,
    tokens: Vec<Token>,
    total_value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddWalletResponse {
    wallet: AddedWallet,
    fetched_at: String,
}

/// Validate a wallet and return its first scan.
async fn add_wallet(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AddWalletRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AddWalletResponse>>> {
    let Json(req) = payload?;
    req.validate()?;

    let chain: Chain = req
        .chain
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unsupported chain: {}", req.chain)))?;
    if !chain.is_valid_address(&req.address) {
        return Err(AppError::BadRequest(
            "Invalid wallet address for specified chain".to_string(),
        ));
    }

    let report = state.scanner.scan(chain, &req.address).await?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{} Wallet", chain.config().name));

    tracing::info!(chain = %chain, address = %req.address, name = %name, "Wallet added");

    Ok(ApiResponse::ok(AddWalletResponse {
        wallet: AddedWallet {
            address: report.address,
            chain,
            name,
            tokens: report.tokens,
            total_value: report.total_value,
        },
        fetched_at: report.fetched_at,
    }))
}

// ─── Cache Management ────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheClearResponse {
    message: &'static str,
    cleared: usize,
    timestamp: String,
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CacheClearResponse>> {
    let cleared = state.scanner.clear_caches();
    tracing::info!(cleared, "Wallet price cache cleared");
    ApiResponse::ok(CacheClearResponse {
        message: "All caches cleared",
        cleared,
        timestamp: now_rfc3339(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheStatsResponse {
    message: &'static str,
    prices: CacheStats,
    timestamp: String,
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CacheStatsResponse>> {
    ApiResponse::ok(CacheStatsResponse {
        message: "Cache statistics for all chains",
        prices: state.scanner.cache_stats(),
        timestamp: now_rfc3339(),
    })
}
