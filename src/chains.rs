// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supported chains and their static configuration.
//!
//! Every chain-specific constant lives in one table so the wallet scanner can
//! run a single pipeline for all networks.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A supported blockchain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Bsc,
    Solana,
}

/// Which JSON-RPC dialect a chain speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcKind {
    Evm,
    Solana,
}

/// Static per-chain configuration.
#[derive(Debug)]
pub struct ChainConfig {
    pub name: &'static str,
    pub native_symbol: &'static str,
    pub native_name: &'static str,
    pub native_decimals: u8,
    /// CoinGecko id of the native asset
    pub coingecko_id: &'static str,
    pub rpc_kind: RpcKind,
    pub rpc_env_var: &'static str,
    pub default_rpc_url: &'static str,
    /// Pause between consecutive token balance lookups
    pub scan_delay: Duration,
    pub estimated_scan_time: &'static str,
    pub known_tokens: &'static [KnownToken],
}

/// A token the scanner checks balances for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownToken {
    /// Contract address (EVM) or mint address (Solana)
    pub address: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    pub coingecko_id: &'static str,
    #[serde(rename = "logoURI")]
    pub logo_uri: &'static str,
}

const ETHEREUM_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        symbol: "WETH",
        name: "Wrapped Ether",
        decimals: 18,
        coingecko_id: "ethereum",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2/logo.png",
    },
    KnownToken {
        address: "0xA0b86a33E6E4e8F6C9fAE7E5Ca4404b7f5d61A9e",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        coingecko_id: "usd-coin",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0xA0b86a33E6E4e8F6C9fAE7E5Ca4404b7f5d61A9e/logo.png",
    },
    KnownToken {
        address: "0xdAC17F958D2ee523a2206206994597C13D831ec7",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        coingecko_id: "tether",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0xdAC17F958D2ee523a2206206994597C13D831ec7/logo.png",
    },
    KnownToken {
        address: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
        symbol: "DAI",
        name: "Dai Stablecoin",
        decimals: 18,
        coingecko_id: "dai",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/0x6B175474E89094C44Da98b954EedeAC495271d0F/logo.png",
    },
];

const POLYGON_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: "0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270",
        symbol: "WMATIC",
        name: "Wrapped Matic",
        decimals: 18,
        coingecko_id: "matic-network",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/polygon/assets/0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270/logo.png",
    },
    KnownToken {
        address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174",
        symbol: "USDC",
        name: "USD Coin (PoS)",
        decimals: 6,
        coingecko_id: "usd-coin",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/polygon/assets/0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174/logo.png",
    },
    KnownToken {
        address: "0xc2132D05D31c914a87C6611C10748AEb04B58e8F",
        symbol: "USDT",
        name: "Tether USD (PoS)",
        decimals: 6,
        coingecko_id: "tether",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/polygon/assets/0xc2132D05D31c914a87C6611C10748AEb04B58e8F/logo.png",
    },
    KnownToken {
        address: "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063",
        symbol: "DAI",
        name: "Dai Stablecoin (PoS)",
        decimals: 18,
        coingecko_id: "dai",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/polygon/assets/0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063/logo.png",
    },
];

const BSC_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c",
        symbol: "WBNB",
        name: "Wrapped BNB",
        decimals: 18,
        coingecko_id: "binancecoin",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/smartchain/assets/0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c/logo.png",
    },
    KnownToken {
        address: "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 18,
        coingecko_id: "usd-coin",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/smartchain/assets/0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d/logo.png",
    },
    KnownToken {
        address: "0x55d398326f99059fF775485246999027B3197955",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 18,
        coingecko_id: "tether",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/smartchain/assets/0x55d398326f99059fF775485246999027B3197955/logo.png",
    },
    KnownToken {
        address: "0x1AF3F329e8BE154074D8769D1FFa4eE058B1DBc3",
        symbol: "DAI",
        name: "Dai Token",
        decimals: 18,
        coingecko_id: "dai",
        logo_uri: "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/smartchain/assets/0x1AF3F329e8BE154074D8769D1FFa4eE058B1DBc3/logo.png",
    },
];

const SOLANA_TOKENS: &[KnownToken] = &[
    KnownToken {
        address: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        coingecko_id: "usd-coin",
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png",
    },
    KnownToken {
        address: "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB",
        symbol: "USDT",
        name: "Tether USD",
        decimals: 6,
        coingecko_id: "tether",
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB/logo.svg",
    },
    KnownToken {
        address: "So11111111111111111111111111111111111111112",
        symbol: "SOL",
        name: "Wrapped SOL",
        decimals: 9,
        coingecko_id: "solana",
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png",
    },
];

static ETHEREUM: ChainConfig = ChainConfig {
    name: "Ethereum",
    native_symbol: "ETH",
    native_name: "Ethereum",
    native_decimals: 18,
    coingecko_id: "ethereum",
    rpc_kind: RpcKind::Evm,
    rpc_env_var: "ETHEREUM_RPC_URL",
    default_rpc_url: "https://ethereum-rpc.publicnode.com",
    scan_delay: Duration::from_millis(100),
    estimated_scan_time: "3-6 seconds",
    known_tokens: ETHEREUM_TOKENS,
};

static POLYGON: ChainConfig = ChainConfig {
    name: "Polygon",
    native_symbol: "MATIC",
    native_name: "Polygon",
    native_decimals: 18,
    coingecko_id: "matic-network",
    rpc_kind: RpcKind::Evm,
    rpc_env_var: "POLYGON_RPC_URL",
    default_rpc_url: "https://polygon-rpc.com",
    scan_delay: Duration::from_millis(100),
    estimated_scan_time: "3-6 seconds",
    known_tokens: POLYGON_TOKENS,
};

static BSC: ChainConfig = ChainConfig {
    name: "BSC",
    native_symbol: "BNB",
    native_name: "BNB",
    native_decimals: 18,
    coingecko_id: "binancecoin",
    rpc_kind: RpcKind::Evm,
    rpc_env_var: "BSC_RPC_URL",
    default_rpc_url: "https://bsc-dataseed.binance.org",
    scan_delay: Duration::from_millis(100),
    estimated_scan_time: "3-6 seconds",
    known_tokens: BSC_TOKENS,
};

static SOLANA: ChainConfig = ChainConfig {
    name: "Solana",
    native_symbol: "SOL",
    native_name: "Solana",
    native_decimals: 9,
    coingecko_id: "solana",
    rpc_kind: RpcKind::Solana,
    rpc_env_var: "SOLANA_RPC_URL",
    default_rpc_url: "https://api.mainnet-beta.solana.com",
    scan_delay: Duration::from_millis(50),
    estimated_scan_time: "5-8 seconds",
    known_tokens: SOLANA_TOKENS,
};

impl Chain {
    /// All supported chains, in display order.
    pub const ALL: [Chain; 4] = [Chain::Ethereum, Chain::Polygon, Chain::Bsc, Chain::Solana];

    /// Static configuration for this chain.
    pub fn config(self) -> &'static ChainConfig {
        match self {
            Chain::Ethereum => &ETHEREUM,
            Chain::Polygon => &POLYGON,
            Chain::Bsc => &BSC,
            Chain::Solana => &SOLANA,
        }
    }

    /// Lowercase identifier used in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
            Chain::Solana => "solana",
        }
    }

    pub fn known_tokens(self) -> &'static [KnownToken] {
        self.config().known_tokens
    }

    /// Check whether `address` is well-formed for this chain.
    ///
    /// EVM chains take `0x` followed by 40 hex digits (checksum casing is not
    /// verified). Solana takes a base58 string that decodes to a 32-byte key.
    pub fn is_valid_address(self, address: &str) -> bool {
        match self.config().rpc_kind {
            RpcKind::Evm => is_valid_evm_address(address),
            RpcKind::Solana => is_valid_solana_address(address),
        }
    }
}

fn is_valid_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex_part) if hex_part.len() == 40 => hex::decode(hex_part).is_ok(),
        _ => false,
    }
}

fn is_valid_solana_address(address: &str) -> bool {
    if !(32..=44).contains(&address.len()) {
        return false;
    }
    matches!(bs58::decode(address).into_vec(), Ok(bytes) if bytes.len() == 32)
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unsupported chain name.
#[derive(Debug, thiserror::Error)]
#[error("Unsupported chain: {0}")]
pub struct UnknownChain(pub String);

impl FromStr for Chain {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "polygon" | "matic" => Ok(Chain::Polygon),
            "bsc" | "bnb" => Ok(Chain::Bsc),
            "solana" | "sol" => Ok(Chain::Solana),
            _ => Err(UnknownChain(s.to_string())),
        }
    }
}
