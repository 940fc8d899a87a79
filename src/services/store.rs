// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Store domain: product catalogue, purchases and the contract's funds.
//!
//! Product prices live on-chain in wei; this service converts them from and
//! to decimal strings at the boundary. Writes are signed by the admin roster
//! entry.

use std::str::FromStr;
use std::sync::Arc;

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use async_trait::async_trait;

use crate::{
    chain::{units, AccountSelector, ChainError, ContractArtifact, Receipt, TxGateway},
    models::{NewProductRequest, Product, Purchase, UpdateProductRequest},
};

use super::decode;

/// Capability contract for the store domain.
#[async_trait]
pub trait StoreApi: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, ChainError>;
    async fn add_product(&self, request: NewProductRequest) -> Result<Receipt, ChainError>;
    async fn update_product(
        &self,
        id: u64,
        request: UpdateProductRequest,
    ) -> Result<Receipt, ChainError>;
    async fn set_product_active(&self, id: u64, active: bool) -> Result<Receipt, ChainError>;
    async fn delete_product(&self, id: u64) -> Result<Receipt, ChainError>;
    async fn register_purchase(
        &self,
        wallet: &str,
        product_id: u64,
        amount: &str,
    ) -> Result<Receipt, ChainError>;
    async fn purchases_by_user(&self, wallet: &str) -> Result<Vec<Purchase>, ChainError>;
    async fn contract_balance(&self) -> Result<String, ChainError>;
    async fn withdraw(&self, amount: &str) -> Result<Receipt, ChainError>;
}

/// The on-chain store service.
pub struct StoreService {
    gateway: Arc<TxGateway>,
    contract: ContractArtifact,
}

impl StoreService {
    pub fn new(gateway: Arc<TxGateway>, contract: ContractArtifact) -> Self {
        Self { gateway, contract }
    }
}

#[async_trait]
impl StoreApi for StoreService {
    async fn products(&self) -> Result<Vec<Product>, ChainError> {
        let outputs = self
            .gateway
            .read_only(&self.contract)
            .call("getProducts", &[])
            .await?;

        let rows = decode::array(decode::single(&outputs, "products")?, "products")?;
        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let product = product_from_value(row)?;
            // Deleted slots come back as zeroed rows
            if product.id != "0" {
                products.push(product);
            }
        }
        Ok(products)
    }

    async fn add_product(&self, request: NewProductRequest) -> Result<Receipt, ChainError> {
        let price = units::parse_native(&request.price)?;
        self.gateway
            .send(
                &self.contract,
                "createProduct",
                &[
                    DynSolValue::String(request.name),
                    DynSolValue::String(request.description),
                    DynSolValue::Uint(price, 256),
                    DynSolValue::Uint(U256::from(request.stock), 256),
                    DynSolValue::String(request.image_url),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn update_product(
        &self,
        id: u64,
        request: UpdateProductRequest,
    ) -> Result<Receipt, ChainError> {
        let price = units::parse_native(&request.price)?;
        self.gateway
            .send(
                &self.contract,
                "updateProduct",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::String(request.name),
                    DynSolValue::String(request.description),
                    DynSolValue::Uint(price, 256),
                    DynSolValue::Uint(U256::from(request.stock), 256),
                    DynSolValue::String(request.image_url),
                    // Applied as sent; an update can deactivate a product
                    DynSolValue::Bool(request.active),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn set_product_active(&self, id: u64, active: bool) -> Result<Receipt, ChainError> {
        self.gateway
            .send(
                &self.contract,
                "setProductActive",
                &[
                    DynSolValue::Uint(U256::from(id), 256),
                    DynSolValue::Bool(active),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn delete_product(&self, id: u64) -> Result<Receipt, ChainError> {
        self.gateway
            .send(
                &self.contract,
                "deleteProduct",
                &[DynSolValue::Uint(U256::from(id), 256)],
                AccountSelector::Admin,
            )
            .await
    }

    /// Record a purchase on-chain for `wallet`.
    ///
    /// The buyer is identified by address only; the admin key signs the
    /// recording. Purchase ids are millisecond timestamps, unique enough for
    /// a demo store with human-paced checkouts.
    async fn register_purchase(
        &self,
        wallet: &str,
        product_id: u64,
        amount: &str,
    ) -> Result<Receipt, ChainError> {
        let buyer = parse_address(wallet)?;
        let amount = units::parse_native(amount)?;
        let purchase_id = chrono::Utc::now().timestamp_millis() as u64;

        self.gateway
            .send(
                &self.contract,
                "registerPurchase",
                &[
                    DynSolValue::Uint(U256::from(purchase_id), 256),
                    DynSolValue::Uint(U256::from(product_id), 256),
                    DynSolValue::Address(buyer),
                    DynSolValue::Uint(amount, 256),
                ],
                AccountSelector::Admin,
            )
            .await
    }

    async fn purchases_by_user(&self, wallet: &str) -> Result<Vec<Purchase>, ChainError> {
        let buyer = parse_address(wallet)?;
        let outputs = self
            .gateway
            .read_only(&self.contract)
            .call("getPurchasesByUser", &[DynSolValue::Address(buyer)])
            .await?;

        let rows = decode::array(decode::single(&outputs, "purchases")?, "purchases")?;
        rows.iter().map(purchase_from_value).collect()
    }

    async fn contract_balance(&self) -> Result<String, ChainError> {
        let balance = self.gateway.native_balance(self.contract.address()).await?;
        Ok(units::format_native(balance))
    }

    async fn withdraw(&self, amount: &str) -> Result<Receipt, ChainError> {
        let value = units::parse_native(amount)?;
        if value.is_zero() {
            return Err(ChainError::InvalidAmount(
                "withdraw amount must be positive".to_string(),
            ));
        }

        // Funds always leave towards the admin address
        let owner = self
            .gateway
            .accounts()
            .resolve_public_address(AccountSelector::Admin)?;

        self.gateway
            .send(
                &self.contract,
                "withdraw",
                &[DynSolValue::Address(owner), DynSolValue::Uint(value, 256)],
                AccountSelector::Admin,
            )
            .await
    }
}

fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim()).map_err(|e| ChainError::InvalidAddress(format!("{raw}: {e}")))
}

fn product_from_value(value: &DynSolValue) -> Result<Product, ChainError> {
    let fields = decode::tuple(value, "product")?;
    Ok(Product {
        id: decode::uint(fields, 0, "product")?.to_string(),
        name: decode::string(fields, 1, "product")?,
        description: decode::string(fields, 2, "product")?,
        price: units::format_native(decode::uint(fields, 3, "product")?),
        stock: decode::uint(fields, 4, "product")?.to_string(),
        image_url: decode::string(fields, 5, "product")?,
        active: decode::boolean(fields, 6, "product")?,
        seller: decode::address(fields, 7, "product")?.to_string(),
    })
}

fn purchase_from_value(value: &DynSolValue) -> Result<Purchase, ChainError> {
    let fields = decode::tuple(value, "purchase")?;
    Ok(Purchase {
        id: decode::uint(fields, 0, "purchase")?.to_string(),
        product_id: decode::uint(fields, 1, "purchase")?.to_string(),
        buyer: decode::address(fields, 2, "purchase")?.to_string(),
        amount: units::format_native(decode::uint(fields, 3, "purchase")?),
        timestamp: decode::uint(fields, 4, "purchase")?.saturating_to::<u64>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_tuple(id: u64) -> DynSolValue {
        DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(id), 256),
            DynSolValue::String("Teclado".into()),
            DynSolValue::String("Teclado mecánico".into()),
            DynSolValue::Uint(U256::from(5_000_000_000_000_000u64), 256),
            DynSolValue::Uint(U256::from(3u64), 256),
            DynSolValue::String("https://example.test/teclado.png".into()),
            DynSolValue::Bool(true),
            DynSolValue::Address(Address::ZERO),
        ])
    }

    #[test]
    fn product_decodes_with_formatted_price() {
        let product = product_from_value(&product_tuple(1)).unwrap();
        assert_eq!(product.id, "1");
        assert_eq!(product.price, "0.005");
        assert_eq!(product.stock, "3");
        assert!(product.active);
    }

    #[test]
    fn malformed_product_row_is_an_encoding_error() {
        let err = product_from_value(&DynSolValue::Bool(true)).unwrap_err();
        assert!(matches!(err, ChainError::Encoding(_)));

        let short = DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(1u64), 256)]);
        assert!(product_from_value(&short).is_err());
    }

    #[test]
    fn purchase_decodes_amount_and_timestamp() {
        let purchase = purchase_from_value(&DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(9u64), 256),
            DynSolValue::Uint(U256::from(1u64), 256),
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Uint(U256::from(1_500_000_000_000_000_000u64), 256),
            DynSolValue::Uint(U256::from(1_700_000_000u64), 256),
        ]))
        .unwrap();
        assert_eq!(purchase.amount, "1.5");
        assert_eq!(purchase.timestamp, 1_700_000_000);
    }

    #[test]
    fn bad_wallet_address_is_rejected() {
        assert!(matches!(
            parse_address("not-a-wallet").unwrap_err(),
            ChainError::InvalidAddress(_)
        ));
    }
}
