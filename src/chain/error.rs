// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Typed errors for the chain core.
//!
//! The gateway never recovers from any of these locally; it surfaces the
//! variant to the calling service, and the HTTP layer maps each variant to a
//! status code without leaking raw provider payloads.

use std::time::Duration;

/// Errors surfaced by the account roster and the transaction gateway.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Malformed key material, ABI artifact or contract address. Fatal at
    /// startup; never produced after construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Account selector outside the configured roster, or a watch-only entry
    /// asked to sign.
    #[error("unknown account: {0}")]
    AccountNotFound(String),

    /// Method name or arguments do not match the contract ABI, or the
    /// envelope could not be assembled. Raised before any network request is
    /// issued.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The node refused the transaction at submission (nonce conflict,
    /// insufficient balance, malformed envelope).
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// Execution completed but the contract logic reverted. Carries the
    /// decoded revert reason when the node supplied one.
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    /// An RPC call exceeded its configured bound.
    #[error("no response from the RPC endpoint within {0:?}")]
    GatewayTimeout(Duration),

    /// The RPC endpoint is unreachable.
    #[error("RPC endpoint unavailable: {0}")]
    UpstreamUnavailable(String),

    /// An amount string is not a valid decimal quantity.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A malformed on-chain address supplied by a caller.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ChainError {
    /// The revert reason, when this error is a revert that carried one.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            ChainError::TransactionReverted(reason) => Some(reason),
            _ => None,
        }
    }
}
