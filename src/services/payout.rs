// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Payout domain: deposits into and releases from the splitter contract.

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use async_trait::async_trait;

use crate::{
    chain::{units, AccountSelector, ChainError, ContractArtifact, Receipt, TxGateway},
    models::ReleasedPayee,
};

use super::decode;

/// Capability contract for the payout domain.
#[async_trait]
pub trait PayoutApi: Send + Sync {
    async fn deposit(&self, amount: &str, selector: AccountSelector)
        -> Result<Receipt, ChainError>;
    async fn release(&self, selector: AccountSelector) -> Result<Receipt, ChainError>;
    async fn release_all(&self) -> Result<Vec<ReleasedPayee>, ChainError>;
    async fn balance(&self) -> Result<String, ChainError>;
}

/// The on-chain payout splitter service.
pub struct PayoutService {
    gateway: Arc<TxGateway>,
    contract: ContractArtifact,
}

impl PayoutService {
    pub fn new(gateway: Arc<TxGateway>, contract: ContractArtifact) -> Self {
        Self { gateway, contract }
    }
}

#[async_trait]
impl PayoutApi for PayoutService {
    async fn deposit(
        &self,
        amount: &str,
        selector: AccountSelector,
    ) -> Result<Receipt, ChainError> {
        self.gateway.deposit(&self.contract, amount, selector).await
    }

    /// Release the selector's own accrued share.
    async fn release(&self, selector: AccountSelector) -> Result<Receipt, ChainError> {
        let payee = self.gateway.accounts().resolve_public_address(selector)?;
        self.gateway
            .send(
                &self.contract,
                "release",
                &[DynSolValue::Address(payee)],
                selector,
            )
            .await
    }

    /// Release every known payee's share, signed by the admin.
    ///
    /// Payees are swept in roster order; the sweep stops at the first
    /// failure, returning the error (shares released so far stay released).
    async fn release_all(&self) -> Result<Vec<ReleasedPayee>, ChainError> {
        let mut released = Vec::new();
        for (payee, _can_sign) in self.gateway.accounts().list_known_accounts() {
            tracing::info!(payee = %payee, "releasing payout share");
            let receipt = self
                .gateway
                .send(
                    &self.contract,
                    "release",
                    &[DynSolValue::Address(payee)],
                    AccountSelector::Admin,
                )
                .await?;
            released.push(ReleasedPayee {
                payee: payee.to_string(),
                receipt,
            });
        }
        Ok(released)
    }

    async fn balance(&self) -> Result<String, ChainError> {
        let outputs = self
            .gateway
            .read_only(&self.contract)
            .call("getBalance", &[])
            .await?;

        let balance = decode::single(&outputs, "balance")?
            .as_uint()
            .map(|(value, _bits)| value)
            .ok_or_else(|| {
                ChainError::Encoding("expected a uint while decoding balance".to_string())
            })?;

        Ok(units::format_native(balance))
    }
}
