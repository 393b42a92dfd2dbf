// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod coingecko;
pub mod currency;
pub mod goals;
pub mod portfolio;
pub mod prices;
pub mod rpc;
pub mod scanner;

pub use coingecko::CoinGeckoClient;
pub use prices::PriceService;
pub use rpc::ChainRpc;
pub use scanner::WalletScanner;
