// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! On-chain core: account resolution and the transaction gateway.
//!
//! This module provides:
//! - Selector → signing key resolution over the configured roster
//! - Transaction construction, signing, submission and confirmation
//! - Read-only contract handles for queries
//! - Revert-reason decoding and amount conversions

pub mod abi;
pub mod accounts;
pub mod error;
pub mod gateway;
pub mod revert;
pub mod units;

pub use abi::ContractArtifact;
pub use accounts::{AccountRoster, AccountSelector};
pub use error::ChainError;
pub use gateway::{ContractHandle, GatewayTimeouts, Receipt, TxGateway};
