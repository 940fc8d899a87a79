// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! The transaction gateway: the single funnel for chain writes.
//!
//! Every write goes through [`TxGateway::send`] or [`TxGateway::deposit`], so
//! nonce, gas and chain-id handling exist exactly once. A submission walks
//! Built → Signed → Submitted and ends Mined-Success, Mined-Reverted or
//! Rejected; callers only ever see the terminal state. Calls sharing a signer
//! serialize through that signer's nonce lock from nonce fetch to submission,
//! so concurrent sends observe strictly increasing nonces.
//!
//! Reads go through [`ContractHandle`]s bound to the shared non-signing
//! provider and never touch key material.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use alloy::{
    dyn_abi::DynSolValue,
    eips::BlockNumberOrTag,
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::{json_rpc::ErrorPayload, types::TransactionRequest},
    transports::{RpcError, TransportErrorKind},
};
use serde::Serialize;
use tokio::time::timeout;
use url::Url;
use utoipa::ToSchema;

use super::{
    abi::ContractArtifact,
    accounts::{AccountRoster, AccountSelector},
    error::ChainError,
    revert, units,
};

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Priority fee attached to every submission (1.5 gwei).
const PRIORITY_FEE: u128 = 1_500_000_000;

/// Base fee assumed when the latest block carries none (25 gwei).
const FALLBACK_BASE_FEE: u128 = 25_000_000_000;

/// Bounds for the gateway's suspension points.
#[derive(Debug, Clone, Copy)]
pub struct GatewayTimeouts {
    /// Per-RPC-call bound: nonce, gas price, estimation, submission.
    pub rpc: Duration,
    /// Bound on waiting for a submitted transaction to be mined.
    pub confirm: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            rpc: Duration::from_secs(30),
            confirm: Duration::from_secs(120),
        }
    }
}

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Transaction hash
    pub tx_hash: String,
    /// Block the transaction was included in
    pub block_number: u64,
    /// Gas actually consumed
    pub gas_used: u64,
    /// Whether execution succeeded
    pub status: bool,
}

/// Gateway over one JSON-RPC endpoint and one account roster.
pub struct TxGateway {
    provider: HttpProvider,
    accounts: Arc<AccountRoster>,
    chain_id: u64,
    timeouts: GatewayTimeouts,
}

impl TxGateway {
    /// Connect to the RPC endpoint and capture its chain id.
    ///
    /// The chain id is fetched once here; the service is single-chain, so it
    /// never changes afterwards.
    pub async fn connect(
        rpc_url: &Url,
        accounts: Arc<AccountRoster>,
        timeouts: GatewayTimeouts,
    ) -> Result<Self, ChainError> {
        let provider = ProviderBuilder::new().connect_http(rpc_url.clone());

        let chain_id = match timeout(timeouts.rpc, provider.get_chain_id()).await {
            Err(_) => return Err(ChainError::GatewayTimeout(timeouts.rpc)),
            Ok(Err(err)) => return Err(rpc_unavailable(err)),
            Ok(Ok(id)) => id,
        };

        Ok(Self {
            provider,
            accounts,
            chain_id,
            timeouts,
        })
    }

    /// The account roster this gateway signs with.
    pub fn accounts(&self) -> &AccountRoster {
        &self.accounts
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// A read-only handle for queries. Never requires a signing account.
    pub fn read_only(&self, contract: &ContractArtifact) -> ContractHandle {
        ContractHandle {
            provider: self.provider.clone(),
            contract: contract.clone(),
            rpc_timeout: self.timeouts.rpc,
        }
    }

    /// Native balance of an arbitrary address (wallets and contracts alike).
    pub async fn native_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.bounded(self.provider.get_balance(address)).await
    }

    /// Submit `method(args…)` against `contract`, signed by `selector`, and
    /// wait for it to be mined.
    pub async fn send(
        &self,
        contract: &ContractArtifact,
        method: &str,
        args: &[DynSolValue],
        selector: AccountSelector,
    ) -> Result<Receipt, ChainError> {
        // Encoding is checked before any network traffic
        let data = contract.encode_call(method, args)?;
        self.submit(contract, method, data, U256::ZERO, selector).await
    }

    /// Deposit native value into `contract` through its `deposit()` entry
    /// point. `amount` is a human-readable decimal string.
    pub async fn deposit(
        &self,
        contract: &ContractArtifact,
        amount: &str,
        selector: AccountSelector,
    ) -> Result<Receipt, ChainError> {
        let value = units::parse_native(amount)?;
        let data = contract.encode_call("deposit", &[])?;
        self.submit(contract, "deposit", data, value, selector).await
    }

    async fn submit(
        &self,
        contract: &ContractArtifact,
        method: &str,
        data: Bytes,
        value: U256,
        selector: AccountSelector,
    ) -> Result<Receipt, ChainError> {
        let signer = self.accounts.resolve_signer(selector)?.clone();
        let from = signer.address();
        let wallet = EthereumWallet::from(signer);

        let pending = {
            // Nonce fetch through submission is serialized per signer; once
            // the node has the transaction in its pool the pending nonce
            // advances and the next caller may proceed.
            let _nonce_guard = self.accounts.nonce_lock(selector)?.lock().await;

            let nonce = self
                .bounded(self.provider.get_transaction_count(from).pending())
                .await?;
            let (max_fee, priority_fee) = self.gas_prices().await?;

            let tx = TransactionRequest::default()
                .with_from(from)
                .with_to(contract.address())
                .with_value(value)
                .with_input(data)
                .with_nonce(nonce)
                .with_chain_id(self.chain_id)
                .with_max_fee_per_gas(max_fee)
                .with_max_priority_fee_per_gas(priority_fee);

            // Estimate against the exact envelope; contract reverts surface
            // here with a decodable reason
            let gas_limit = match timeout(self.timeouts.rpc, self.provider.estimate_gas(tx.clone()))
                .await
            {
                Err(_) => return Err(ChainError::GatewayTimeout(self.timeouts.rpc)),
                Ok(Err(err)) => return Err(execution_error(err)),
                Ok(Ok(gas)) => gas,
            };
            let tx = tx.with_gas_limit(gas_limit);

            // Signing is local, pure computation
            let envelope = tx.build(&wallet).await.map_err(|e| {
                ChainError::Encoding(format!("could not sign the transaction: {e}"))
            })?;

            match timeout(self.timeouts.rpc, self.provider.send_tx_envelope(envelope)).await {
                Err(_) => return Err(ChainError::GatewayTimeout(self.timeouts.rpc)),
                Ok(Err(err)) => return Err(execution_error(err)),
                Ok(Ok(pending)) => pending,
            }
        };

        let tx_hash = format!("{:?}", pending.tx_hash());
        tracing::info!(
            contract = contract.name(),
            method,
            %tx_hash,
            "transaction submitted"
        );

        let mined = timeout(self.timeouts.confirm, pending.get_receipt())
            .await
            .map_err(|_| ChainError::GatewayTimeout(self.timeouts.confirm))?
            .map_err(|e| ChainError::UpstreamUnavailable(e.to_string()))?;

        let receipt = Receipt {
            tx_hash,
            block_number: mined.block_number.unwrap_or(0),
            gas_used: mined.gas_used as u64,
            status: mined.status(),
        };

        if !receipt.status {
            return Err(ChainError::TransactionReverted(format!(
                "transaction {} reverted on-chain",
                receipt.tx_hash
            )));
        }

        tracing::info!(
            contract = contract.name(),
            method,
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            "transaction mined"
        );
        Ok(receipt)
    }

    /// Current EIP-1559 fees: max fee from the latest block's base fee with
    /// headroom for one doubling, plus a fixed priority tip.
    async fn gas_prices(&self) -> Result<(u128, u128), ChainError> {
        let block = self
            .bounded(self.provider.get_block_by_number(BlockNumberOrTag::Latest))
            .await?
            .ok_or_else(|| ChainError::UpstreamUnavailable("no latest block".to_string()))?;

        let base_fee: u128 = block
            .header
            .base_fee_per_gas
            .map(|f| f as u128)
            .unwrap_or(FALLBACK_BASE_FEE);

        let max_fee = base_fee.saturating_mul(2).saturating_add(PRIORITY_FEE);

        Ok((max_fee, PRIORITY_FEE))
    }

    /// Run one RPC call under the per-call bound.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, ChainError>
    where
        F: IntoFuture<Output = Result<T, RpcError<TransportErrorKind>>>,
    {
        match timeout(self.timeouts.rpc, fut).await {
            Err(_) => Err(ChainError::GatewayTimeout(self.timeouts.rpc)),
            Ok(Err(err)) => Err(rpc_unavailable(err)),
            Ok(Ok(value)) => Ok(value),
        }
    }
}

/// A (address, ABI) pair bound to the shared non-signing provider.
pub struct ContractHandle {
    provider: HttpProvider,
    contract: ContractArtifact,
    rpc_timeout: Duration,
}

impl ContractHandle {
    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// `eth_call` `method(args…)` and decode the outputs.
    pub async fn call(
        &self,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ChainError> {
        let data = self.contract.encode_call(method, args)?;

        let tx = TransactionRequest::default()
            .with_to(self.contract.address())
            .with_input(data);

        let raw = match timeout(self.rpc_timeout, self.provider.call(tx)).await {
            Err(_) => return Err(ChainError::GatewayTimeout(self.rpc_timeout)),
            Ok(Err(err)) => return Err(execution_error(err)),
            Ok(Ok(bytes)) => bytes,
        };

        self.contract.decode_output(method, &raw)
    }
}

/// Transport-level failure: the endpoint is unreachable or misbehaving.
fn rpc_unavailable(err: RpcError<TransportErrorKind>) -> ChainError {
    match err {
        RpcError::Transport(kind) => ChainError::UpstreamUnavailable(kind.to_string()),
        other => ChainError::UpstreamUnavailable(other.to_string()),
    }
}

/// Execution-path failure: distinguishes a contract revert (reason attached
/// when the node supplied one) from a plain submission rejection.
fn execution_error(err: RpcError<TransportErrorKind>) -> ChainError {
    match err {
        RpcError::ErrorResp(payload) => {
            let raw = error_payload_text(&payload);
            if let Some(reason) = revert::extract_revert_reason(&raw) {
                ChainError::TransactionReverted(reason)
            } else if raw.contains("execution reverted") {
                ChainError::TransactionReverted(revert::revert_message(&raw))
            } else {
                ChainError::TransactionRejected(payload.message.to_string())
            }
        }
        RpcError::Transport(kind) => ChainError::UpstreamUnavailable(kind.to_string()),
        other => ChainError::UpstreamUnavailable(other.to_string()),
    }
}

fn error_payload_text(payload: &ErrorPayload) -> String {
    match &payload.data {
        Some(data) => format!("{} {}", payload.message, data),
        None => payload.message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_resp(message: &str, data: Option<&str>) -> RpcError<TransportErrorKind> {
        let json = match data {
            Some(data) => format!(r#"{{"code":3,"message":"{message}","data":"{data}"}}"#),
            None => format!(r#"{{"code":3,"message":"{message}"}}"#),
        };
        let payload: ErrorPayload = serde_json::from_str(&json).unwrap();
        RpcError::ErrorResp(payload)
    }

    #[test]
    fn revert_with_reason_is_classified_with_the_reason() {
        let err = execution_error(error_resp(
            "execution reverted: Producto no disponible",
            None,
        ));
        match err {
            ChainError::TransactionReverted(reason) => {
                assert_eq!(reason, "Producto no disponible")
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn revert_reason_is_recovered_from_error_data() {
        use alloy::sol_types::{Revert, SolError};

        let encoded = alloy::hex::encode_prefixed(
            Revert {
                reason: "Sin permisos".to_string(),
            }
            .abi_encode(),
        );
        let err = execution_error(error_resp("execution reverted", Some(&encoded)));
        match err {
            ChainError::TransactionReverted(reason) => assert_eq!(reason, "Sin permisos"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn node_refusal_is_a_rejection() {
        let err = execution_error(error_resp(
            "insufficient funds for gas * price + value",
            None,
        ));
        assert!(matches!(err, ChainError::TransactionRejected(_)));
    }

    #[test]
    fn transport_failure_is_upstream_unavailable() {
        let err = rpc_unavailable(RpcError::Transport(TransportErrorKind::BackendGone));
        assert!(matches!(err, ChainError::UpstreamUnavailable(_)));
    }

    #[test]
    fn default_timeouts_are_bounded() {
        let timeouts = GatewayTimeouts::default();
        assert_eq!(timeouts.rpc, Duration::from_secs(30));
        assert_eq!(timeouts.confirm, Duration::from_secs(120));
    }
}
