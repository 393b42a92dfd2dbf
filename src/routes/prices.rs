// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Price, rate and portfolio routes, mounted under `/api/prices`.

use crate::cache::CacheStats;
use crate::error::{AppError, Result};
use crate::models::portfolio::PortfolioRequest;
use crate::models::price::{PriceMap, RateTable};
use crate::models::{PortfolioValuation, TickerEntry, WalletInput};
use crate::routes::ApiResponse;
use crate::services::currency::{convert, format_currency};
use crate::services::goals::{self, GoalsReport};
use crate::services::portfolio;
use crate::services::prices::ConnectivityReport;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rates", get(get_rates))
        .route("/realtime", get(get_realtime))
        .route("/top10", get(get_top10))
        .route("/ticker/data", get(get_ticker))
        .route("/portfolio/calculate", post(calculate_portfolio))
        .route("/portfolio/convert", post(convert_value))
        .route("/portfolio/goals", post(goal_progress))
        .route("/cache", delete(clear_cache))
        .route("/cache/stats", get(cache_stats))
        .route("/test/connectivity", get(test_connectivity))
        .route("/{symbols}", get(get_prices))
}

/// Split a comma-separated query value, dropping blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ─── Spot Prices ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PricesResponse {
    prices: PriceMap,
    cached: bool,
    fetched_at: String,
}

async fn get_prices(
    State(state): State<Arc<AppState>>,
    Path(symbols): Path<String>,
) -> Result<Json<ApiResponse<PricesResponse>>> {
    let (prices, cached) = state
        .prices
        .prices_for_symbols(&split_list(&symbols))
        .await?;
    Ok(ApiResponse::ok(PricesResponse {
        prices,
        cached,
        fetched_at: now_rfc3339(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RatesResponse {
    rates: RateTable,
    source: &'static str,
    fetched_at: String,
}

async fn get_rates(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse<RatesResponse>>> {
    let (rates, cached) = state.prices.rates().await?;
    Ok(ApiResponse::ok(RatesResponse {
        rates,
        source: if cached { "cache" } else { "CoinGecko API" },
        fetched_at: now_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct RealtimeQuery {
    coins: Option<String>,
    currencies: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeResponse {
    prices: PriceMap,
    cross_rates: RateTable,
    source: &'static str,
    fetched_at: String,
}

async fn get_realtime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RealtimeQuery>,
) -> Result<Json<ApiResponse<RealtimeResponse>>> {
    let coins = split_list(query.coins.as_deref().unwrap_or("bitcoin,ethereum,solana"));
    let currencies = split_list(query.currencies.as_deref().unwrap_or("usd"));
    if coins.is_empty() || currencies.is_empty() {
        return Err(AppError::BadRequest(
            "coins and currencies must not be empty".to_string(),
        ));
    }

    let (prices, cross_rates) = state.prices.realtime(&coins, &currencies).await?;
    Ok(ApiResponse::ok(RealtimeResponse {
        prices,
        cross_rates,
        source: "CoinGecko API",
        fetched_at: now_rfc3339(),
    }))
}

// ─── Market Overview ─────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Top10Response {
    top10: Vec<TickerEntry>,
    count: usize,
    source: &'static str,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    fetched_at: String,
}

async fn get_top10(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Top10Response>> {
    let top = state.prices.top10().await;
    ApiResponse::ok(Top10Response {
        count: top.coins.len(),
        top10: top.coins,
        source: top.source,
        cached: top.cached,
        error: top.error,
        fetched_at: now_rfc3339(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    ticker: Vec<TickerEntry>,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    fetched_at: String,
}

async fn get_ticker(State(state): State<Arc<AppState>>) -> Json<ApiResponse<TickerResponse>> {
    let ticker = state.prices.ticker().await;
    ApiResponse::ok(TickerResponse {
        ticker: ticker.entries,
        source: ticker.source,
        error: ticker.error,
        fetched_at: now_rfc3339(),
    })
}

// ─── Portfolio ───────────────────────────────────────────────

#[derive(Serialize)]
struct PortfolioResponse {
    portfolio: PortfolioValuation,
}

async fn calculate_portfolio(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PortfolioResponse>>> {
    let Json(req) = payload?;
    let wallets = req
        .wallets
        .ok_or_else(|| AppError::BadRequest("Wallets array required".to_string()))?;

    let portfolio = portfolio::calculate(&state.prices, wallets).await?;
    Ok(ApiResponse::ok(PortfolioResponse { portfolio }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConvertRequest {
    pub value: f64,
    #[validate(length(min = 1, max = 10))]
    pub from: String,
    #[validate(length(min = 1, max = 10))]
    pub to: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResponse {
    value: f64,
    from: String,
    to: String,
    converted: f64,
    formatted: String,
    fetched_at: String,
}

async fn convert_value(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ConvertResponse>>> {
    let Json(req) = payload?;
    req.validate()?;

    let from = req.from.to_ascii_lowercase();
    let to = req.to.to_ascii_lowercase();
    let (rates, _) = state.prices.rates().await?;
    let converted = convert(req.value, &from, &to, &rates);

    Ok(ApiResponse::ok(ConvertResponse {
        value: req.value,
        formatted: format_currency(converted, &to),
        from,
        to,
        converted,
        fetched_at: now_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct GoalsRequest {
    #[serde(default)]
    wallets: Vec<WalletInput>,
    #[serde(default)]
    goals: BTreeMap<String, f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalsResponse {
    #[serde(flatten)]
    report: GoalsReport,
    fetched_at: String,
}

async fn goal_progress(
    payload: std::result::Result<Json<GoalsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GoalsResponse>>> {
    let Json(req) = payload?;
    Ok(ApiResponse::ok(GoalsResponse {
        report: goals::evaluate(&req.wallets, &req.goals),
        fetched_at: now_rfc3339(),
    }))
}

// ─── Cache & Diagnostics ─────────────────────────────────────

#[derive(Serialize)]
struct CacheClearResponse {
    message: &'static str,
    cleared: usize,
    timestamp: String,
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CacheClearResponse>> {
    let cleared = state.prices.clear();
    tracing::info!(cleared, "Price cache cleared");
    ApiResponse::ok(CacheClearResponse {
        message: "Cache cleared",
        cleared,
        timestamp: now_rfc3339(),
    })
}

#[derive(Serialize)]
struct CacheStatsResponse {
    caches: BTreeMap<&'static str, CacheStats>,
    size: usize,
    timestamp: String,
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CacheStatsResponse>> {
    ApiResponse::ok(CacheStatsResponse {
        caches: state.prices.stats(),
        size: state.prices.size(),
        timestamp: now_rfc3339(),
    })
}

#[derive(Serialize)]
struct ConnectivityResponse {
    #[serde(flatten)]
    report: ConnectivityReport,
    timestamp: String,
}

async fn test_connectivity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ConnectivityResponse>>> {
    let report = state.prices.connectivity().await?;
    Ok(ApiResponse::ok(ConnectivityResponse {
        report,
        timestamp: now_rfc3339(),
    }))
}
