// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-RPC clients for balance lookups.
//!
//! EVM chains (Ethereum, Polygon, BSC) share one client. Solana has its own
//! because its method names and result shapes differ.

use crate::chains::{Chain, KnownToken, RpcKind};
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// ERC-20 `balanceOf(address)` function selector.
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Minimal JSON-RPC 2.0 transport.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Invoke `method` and decode its `result`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, AppError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .timeout(RPC_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Rpc(format!("{} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Rpc(format!("{}: HTTP {}: {}", method, status, body)));
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::Rpc(format!("{}: JSON parse error: {}", method, e)))?;

        if let Some(err) = body.error {
            return Err(AppError::Rpc(format!(
                "{}: error {}: {}",
                method, err.code, err.message
            )));
        }

        body.result
            .ok_or_else(|| AppError::Rpc(format!("{}: missing result", method)))
    }
}

/// Client for Ethereum-compatible nodes.
#[derive(Clone)]
pub struct EvmRpc {
    rpc: RpcClient,
}

impl EvmRpc {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Native balance in whole coins (wei / 10^18).
    pub async fn get_balance(&self, address: &str) -> Result<f64, AppError> {
        let wei: String = self
            .rpc
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        Ok(hex_quantity_to_f64(&wei)? / 10f64.powi(18))
    }

    /// ERC-20 balance of `owner` scaled by the token's decimals.
    pub async fn erc20_balance(
        &self,
        owner: &str,
        contract: &str,
        decimals: u8,
    ) -> Result<f64, AppError> {
        let raw: String = self
            .rpc
            .call(
                "eth_call",
                json!([{"to": contract, "data": balance_of_calldata(owner)?}, "latest"]),
            )
            .await?;
        Ok(hex_quantity_to_f64(&raw)? / 10f64.powi(decimals as i32))
    }

    pub async fn block_number(&self) -> Result<u64, AppError> {
        let raw: String = self.rpc.call("eth_blockNumber", json!([])).await?;
        Ok(hex_quantity_to_f64(&raw)? as u64)
    }
}

/// Client for Solana nodes.
#[derive(Clone)]
pub struct SolanaRpc {
    rpc: RpcClient,
}

#[derive(Deserialize)]
struct ContextValue<T> {
    value: T,
}

#[derive(Deserialize)]
struct KeyedTokenAccount {
    account: TokenAccount,
}

#[derive(Deserialize)]
struct TokenAccount {
    data: TokenAccountData,
}

#[derive(Deserialize)]
struct TokenAccountData {
    parsed: ParsedTokenAccount,
}

#[derive(Deserialize)]
struct ParsedTokenAccount {
    info: TokenAccountInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAccountInfo {
    token_amount: UiTokenAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiTokenAmount {
    ui_amount: Option<f64>,
}

impl SolanaRpc {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// SOL balance (lamports / 10^9).
    pub async fn get_balance(&self, address: &str) -> Result<f64, AppError> {
        let result: ContextValue<u64> = self.rpc.call("getBalance", json!([address])).await?;
        Ok(result.value as f64 / LAMPORTS_PER_SOL)
    }

    /// UI amount held in the owner's first token account for `mint`.
    pub async fn token_balance(&self, owner: &str, mint: &str) -> Result<f64, AppError> {
        let result: ContextValue<Vec<KeyedTokenAccount>> = self
            .rpc
            .call(
                "getTokenAccountsByOwner",
                json!([owner, {"mint": mint}, {"encoding": "jsonParsed"}]),
            )
            .await?;

        Ok(result
            .value
            .first()
            .and_then(|acct| acct.account.data.parsed.info.token_amount.ui_amount)
            .unwrap_or(0.0))
    }

    pub async fn health(&self) -> Result<String, AppError> {
        self.rpc.call("getHealth", json!([])).await
    }
}

/// Balance source for one chain.
#[derive(Clone)]
pub enum ChainRpc {
    Evm(EvmRpc),
    Solana(SolanaRpc),
}

impl ChainRpc {
    pub fn for_chain(http: reqwest::Client, chain: Chain, url: &str) -> Self {
        let rpc = RpcClient::new(http, url);
        match chain.config().rpc_kind {
            RpcKind::Evm => ChainRpc::Evm(EvmRpc::new(rpc)),
            RpcKind::Solana => ChainRpc::Solana(SolanaRpc::new(rpc)),
        }
    }

    pub async fn native_balance(&self, address: &str) -> Result<f64, AppError> {
        match self {
            ChainRpc::Evm(evm) => evm.get_balance(address).await,
            ChainRpc::Solana(sol) => sol.get_balance(address).await,
        }
    }

    pub async fn token_balance(&self, owner: &str, token: &KnownToken) -> Result<f64, AppError> {
        match self {
            ChainRpc::Evm(evm) => evm.erc20_balance(owner, token.address, token.decimals).await,
            ChainRpc::Solana(sol) => sol.token_balance(owner, token.address).await,
        }
    }

    /// Liveness probe: latest block for EVM, `getHealth` for Solana.
    pub async fn probe(&self) -> Result<String, AppError> {
        match self {
            ChainRpc::Evm(evm) => evm
                .block_number()
                .await
                .map(|block| format!("Latest block: {}", block)),
            ChainRpc::Solana(sol) => sol.health().await,
        }
    }
}

/// ABI-encode `balanceOf(owner)`.
fn balance_of_calldata(owner: &str) -> Result<String, AppError> {
    let hex_part = owner
        .strip_prefix("0x")
        .filter(|h| h.len() == 40 && hex::decode(h).is_ok())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid EVM address: {}", owner)))?;
    Ok(format!(
        "{}{:0>64}",
        BALANCE_OF_SELECTOR,
        hex_part.to_ascii_lowercase()
    ))
}

/// Decode a `0x`-prefixed hex quantity of any width into an `f64`.
///
/// uint256 token balances can exceed `u128`, so digits are folded into a
/// float directly.
fn hex_quantity_to_f64(raw: &str) -> Result<f64, AppError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    digits.chars().try_fold(0f64, |acc, c| {
        c.to_digit(16)
            .map(|d| acc * 16.0 + d as f64)
            .ok_or_else(|| AppError::Rpc(format!("Invalid hex quantity: {}", raw)))
    })
}
