// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use crate::chains::Chain;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// Directory with the browser frontend, served at `/` when set
    pub static_dir: Option<PathBuf>,

    /// CoinGecko REST base URL
    pub coingecko_base_url: String,
    /// Optional CoinGecko demo API key
    pub coingecko_api_key: Option<String>,

    pub ethereum_rpc_url: String,
    pub polygon_rpc_url: String,
    pub bsc_rpc_url: String,
    pub solana_rpc_url: String,

    /// Overrides the per-chain pause between token balance lookups.
    pub scan_delay: Option<Duration>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 3000,
            frontend_url: "http://localhost:3000".to_string(),
            static_dir: None,
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            coingecko_api_key: None,
            ethereum_rpc_url: Chain::Ethereum.config().default_rpc_url.to_string(),
            polygon_rpc_url: Chain::Polygon.config().default_rpc_url.to_string(),
            bsc_rpc_url: Chain::Bsc.config().default_rpc_url.to_string(),
            solana_rpc_url: Chain::Solana.config().default_rpc_url.to_string(),
            scan_delay: Some(Duration::ZERO),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let scan_delay = match env::var("SCAN_DELAY_MS") {
            Ok(raw) => Some(Duration::from_millis(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("SCAN_DELAY_MS"))?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            coingecko_base_url: env::var("COINGECKO_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_COINGECKO_BASE_URL.to_string()),
            coingecko_api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            ethereum_rpc_url: rpc_url_from_env(Chain::Ethereum),
            polygon_rpc_url: rpc_url_from_env(Chain::Polygon),
            bsc_rpc_url: rpc_url_from_env(Chain::Bsc),
            solana_rpc_url: rpc_url_from_env(Chain::Solana),
            scan_delay,
        })
    }

    /// RPC endpoint configured for a chain.
    pub fn rpc_url(&self, chain: Chain) -> &str {
        match chain {
            Chain::Ethereum => &self.ethereum_rpc_url,
            Chain::Polygon => &self.polygon_rpc_url,
            Chain::Bsc => &self.bsc_rpc_url,
            Chain::Solana => &self.solana_rpc_url,
        }
    }
}

fn rpc_url_from_env(chain: Chain) -> String {
    let config = chain.config();
    env::var(config.rpc_env_var).unwrap_or_else(|_| config.default_rpc_url.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("SOLANA_RPC_URL", "http://localhost:8899");
        env::set_var("COINGECKO_BASE_URL", "http://localhost:9000/api/v3/");
        env::set_var("COINGECKO_API_KEY", "  ");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.rpc_url(Chain::Solana), "http://localhost:8899");
        assert_eq!(config.coingecko_base_url, "http://localhost:9000/api/v3");
        assert!(config.coingecko_api_key.is_none());
    }

    #[test]
    fn test_default_uses_public_endpoints() {
        let config = Config::default();
        assert_eq!(config.rpc_url(Chain::Bsc), "https://bsc-dataseed.binance.org");
        assert_eq!(config.scan_delay, Some(Duration::ZERO));
    }
}
