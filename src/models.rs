// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation. Successful responses carry `success: true`; failures are
//! produced by [`crate::error::ApiError`] with `success: false`.
//!
//! Amounts and prices travel as decimal strings in native units; the chain
//! core converts them to wei without precision loss.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chain::Receipt;

// =============================================================================
// Store Models
// =============================================================================

/// A listed product, as read from the store contract.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in native units, decimal string.
    pub price: String,
    pub stock: String,
    pub image_url: String,
    pub active: bool,
    /// Address of the seller that listed the product.
    pub seller: String,
}

/// A purchase recorded on-chain for some buyer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub buyer: String,
    /// Amount paid in native units, decimal string.
    pub amount: String,
    /// Unix timestamp of the purchase block.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRequest {
    pub name: String,
    pub description: String,
    /// Price in native units, decimal string (e.g. "0.005").
    pub price: String,
    pub stock: u64,
    pub image_url: String,
}

/// Full product update. `active` is required: the update applies exactly what
/// the caller sends, it is never defaulted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u64,
    pub image_url: String,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetProductActiveRequest {
    pub active: bool,
}

/// Record a purchase for the logged-in wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPurchaseRequest {
    pub product_id: u64,
    /// Amount paid in native units, decimal string.
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Amount in native units, decimal string. Must be positive.
    pub amount: String,
}

// =============================================================================
// Personnel Models
// =============================================================================

/// A registered person, as read from the registry contract.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub image_url: String,
    pub salary: String,
    pub active: bool,
    pub wallet: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub role: String,
    pub image_url: String,
    /// Salary as a plain integer string.
    pub salary: String,
    pub wallet: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSalaryRequest {
    pub salary: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPersonActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBasicDataRequest {
    pub email: String,
    pub username: String,
    pub image_url: String,
}

// =============================================================================
// Payment Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Amount in native units, decimal string.
    pub amount: String,
    /// Roster index of the depositing account; the admin when omitted.
    pub account: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReleaseRequest {
    /// Roster index of the payee account; the admin when omitted.
    pub account: Option<usize>,
}

/// One payee released by a release-all sweep.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedPayee {
    pub payee: String,
    pub receipt: Receipt,
}

// =============================================================================
// Session Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Wallet address to log in as; must exist in the on-chain registry.
    pub wallet: String,
}

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct TxResponse {
    pub success: bool,
    pub receipt: Receipt,
}

impl TxResponse {
    pub fn mined(receipt: Receipt) -> Self {
        Self {
            success: true,
            receipt,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PurchasesResponse {
    pub success: bool,
    pub purchases: Vec<Purchase>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonsResponse {
    pub success: bool,
    pub persons: Vec<Person>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonResponse {
    pub success: bool,
    pub person: Person,
}

/// Balance in native units, decimal string.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub success: bool,
    pub balance: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReleaseAllResponse {
    pub success: bool,
    pub released: Vec<ReleasedPayee>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token identifying the session.
    pub token: String,
    pub person: Person,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}
