// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod portfolio;
pub mod price;
pub mod token;
pub mod wallet;

pub use portfolio::{HoldingInput, PortfolioValuation, WalletInput};
pub use price::{CoinQuote, PriceMap, RateTable, TickerEntry};
pub use token::{Token, TokenSource};
pub use wallet::{WalletReport, WalletSummary};
