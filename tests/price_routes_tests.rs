// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Price, portfolio and goal route tests.

use axum::http::StatusCode;
use httpmock::prelude::*;
use serde_json::json;

mod common;

async fn mock_base_prices(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/simple/price")
                .query_param("ids", "bitcoin,ethereum,solana");
            then.status(200).json_body(json!({
                "bitcoin": {"usd": 50000.0, "usd_24h_change": 1.0},
                "ethereum": {"usd": 2500.0, "usd_24h_change": -2.0},
                "solana": {"usd": 25.0, "usd_24h_change": 4.0}
            }));
        })
        .await;
}

#[tokio::test]
async fn test_prices_are_keyed_by_requested_symbol() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    let mock = coingecko
        .mock_async(|when, then| {
            when.method(GET)
                .path("/simple/price")
                .query_param("ids", "ethereum,bitcoin");
            then.status(200).json_body(json!({
                "ethereum": {"usd": 2500.0},
                "bitcoin": {"usd": 50000.0}
            }));
        })
        .await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);

    let (status, body) = common::send(app.clone(), common::get("/api/prices/ETH,btc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prices"]["eth"]["usd"], 2500.0);
    assert_eq!(body["prices"]["btc"]["usd"], 50000.0);
    assert_eq!(body["cached"], false);

    let (_, body) = common::send(app, common::get("/api/prices/eth,btc")).await;
    assert_eq!(body["cached"], true);
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_rates_matrix_and_cache_source() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);

    let (status, body) = common::send(app.clone(), common::get("/api/prices/rates")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "CoinGecko API");
    assert_eq!(body["rates"]["btc"]["eth"], 20.0);
    assert_eq!(body["rates"]["eth"]["sol"], 100.0);
    assert_eq!(body["rates"].as_object().unwrap().len(), 4);

    let (_, body) = common::send(app, common::get("/api/prices/rates")).await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn test_realtime_defaults_and_cross_rates() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) = common::send(app, common::get("/api/prices/realtime")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prices"]["solana"]["usd"], 25.0);
    assert_eq!(body["crossRates"]["usd"]["btc"], 1.0 / 50000.0);
}

#[tokio::test]
async fn test_top10_falls_back_when_upstream_is_down() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/prices/top10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback_data");
    assert_eq!(body["count"], 10);
    assert_eq!(body["top10"][0]["symbol"], "BTC");
    assert_eq!(body["top10"][0]["rank"], 1);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_ticker_uses_static_data_as_last_resort() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(app, common::get("/api/prices/ticker/data")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "ultimate_fallback");
    assert_eq!(body["ticker"].as_array().unwrap().len(), 6);
    assert_eq!(body["ticker"][0]["changeText"], "+2.4%");
}

#[tokio::test]
async fn test_ticker_prefers_live_top_coins() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    coingecko
        .mock_async(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(200).json_body(json!([{
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "current_price": 60000.0,
                "price_change_percentage_24h": -1.5,
                "market_cap": 1.2e12,
                "market_cap_rank": 1,
                "image": "https://example.com/btc.png"
            }]));
        })
        .await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) = common::send(app, common::get("/api/prices/ticker/data")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "top10_live");
    assert_eq!(body["ticker"][0]["symbol"], "BTC");
    assert_eq!(body["ticker"][0]["positive"], false);
}

#[tokio::test]
async fn test_portfolio_requires_wallets_array() {
    for payload in [json!({}), json!({"wallets": "nope"})] {
        let (app, _state) = common::create_test_app();
        let (status, body) = common::send(
            app,
            common::post_json("/api/prices/portfolio/calculate", &payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_portfolio_total_matches_token_values() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    coingecko
        .mock_async(|when, then| {
            when.method(GET).path("/simple/price");
            then.status(200).json_body(json!({
                "ethereum": {"usd": 2500.0, "usd_24h_change": 3.0},
                "usd-coin": {"usd": 1.0}
            }));
        })
        .await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) = common::send(
        app,
        common::post_json(
            "/api/prices/portfolio/calculate",
            &json!({"wallets": [
                {"address": "0xabc", "name": "Main", "tokens": [
                    {"symbol": "ETH", "balance": "2"},
                    {"symbol": "USDC", "balance": 100.5}
                ]},
                {"address": "0xdef", "tokens": [
                    {"symbol": "MYSTERY", "balance": "12"}
                ]}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let portfolio = &body["portfolio"];
    assert_eq!(portfolio["walletCount"], 2);
    assert_eq!(portfolio["wallets"][0]["name"], "Main");
    assert_eq!(portfolio["wallets"][0]["tokens"][0]["change24h"], 3.0);
    assert_eq!(portfolio["wallets"][1]["totalValue"], 0.0);

    let token_sum: f64 = portfolio["wallets"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|w| w["tokens"].as_array().unwrap())
        .map(|t| t["value"].as_f64().unwrap())
        .sum();
    assert_eq!(portfolio["totalValue"].as_f64().unwrap(), token_sum);
    assert_eq!(token_sum, 5100.5);
}

#[tokio::test]
async fn test_convert_uses_cross_rates() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) = common::send(
        app,
        common::post_json(
            "/api/prices/portfolio/convert",
            &json!({"value": 2.0, "from": "ETH", "to": "usd"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["converted"], 5000.0);
    assert_eq!(body["formatted"], "$5,000.00");
}

#[tokio::test]
async fn test_convert_validates_currency_codes() {
    let (app, _state) = common::create_test_app();

    let (status, _) = common::send(
        app,
        common::post_json(
            "/api/prices/portfolio/convert",
            &json!({"value": 1.0, "from": "", "to": "usd"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goal_progress() {
    let (app, _state) = common::create_test_app();

    let (status, body) = common::send(
        app,
        common::post_json(
            "/api/prices/portfolio/goals",
            &json!({
                "wallets": [{"tokens": [
                    {"symbol": "ETH", "balance": "1"},
                    {"symbol": "WETH", "balance": "1"},
                    {"symbol": "USDC", "balance": "50"}
                ]}],
                "goals": {"eth": 4.0, "usdc": 25.0}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["holdings"]["eth"], 2.0);
    assert_eq!(body["goals"][0]["currency"], "eth");
    assert_eq!(body["goals"][0]["progress"], 50.0);
    assert_eq!(body["goals"][1]["achieved"], true);
    assert_eq!(body["summary"]["activeGoals"], 2);
}

#[tokio::test]
async fn test_clear_price_cache() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;

    let (app, state) = common::create_mocked_app(&coingecko, &rpc);
    common::send(app.clone(), common::get("/api/prices/rates")).await;
    assert_eq!(state.prices.size(), 1);

    let (status, body) = common::send(app, common::delete("/api/prices/cache")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 1);
    assert_eq!(state.prices.size(), 0);
}

#[tokio::test]
async fn test_price_cache_stats_by_cache() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    common::send(app.clone(), common::get("/api/prices/rates")).await;

    let (status, body) = common::send(app, common::get("/api/prices/cache/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["size"], 1);
    assert_eq!(body["caches"]["rates"]["size"], 1);
    assert_eq!(body["caches"]["rates"]["fresh"], 1);
    assert_eq!(body["caches"]["quotes"]["size"], 0);
    assert_eq!(body["caches"]["topCoins"]["size"], 0);
}

#[tokio::test]
async fn test_connectivity_reports_working_endpoints() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;
    coingecko
        .mock_async(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(200).json_body(json!([]));
        })
        .await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) =
        common::send(app, common::get("/api/prices/test/connectivity")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["coingeckoApi"], "connected");
    assert_eq!(body["top10Endpoint"], "working");
    assert_eq!(body["apiKey"], "missing");
    assert_eq!(body["testResults"]["bitcoin"]["status"], "working");
    assert_eq!(body["testResults"]["bitcoin"]["price"], 50000.0);
    assert_eq!(body["testResults"]["solana"]["change24h"], 4.0);
}

#[tokio::test]
async fn test_connectivity_flags_failed_markets_endpoint() {
    let coingecko = MockServer::start_async().await;
    let rpc = MockServer::start_async().await;
    mock_base_prices(&coingecko).await;
    coingecko
        .mock_async(|when, then| {
            when.method(GET).path("/coins/markets");
            then.status(500).body("upstream exploded");
        })
        .await;

    let (app, _state) = common::create_mocked_app(&coingecko, &rpc);
    let (status, body) =
        common::send(app, common::get("/api/prices/test/connectivity")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coingeckoApi"], "connected");
    assert!(body["top10Endpoint"]
        .as_str()
        .unwrap()
        .starts_with("failed"));
    assert_eq!(body["testResults"]["ethereum"]["status"], "working");
}
