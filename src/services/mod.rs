// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Domain services: one implementation per contract domain.
//!
//! Route handlers depend on the capability traits (`StoreApi`, `RegistryApi`,
//! `PayoutApi`), not on the concrete services, so the HTTP layer can be
//! exercised against mocks and the on-chain implementation stays swappable.

pub mod decode;
pub mod payout;
pub mod registry;
pub mod store;

pub use payout::{PayoutApi, PayoutService};
pub use registry::{RegistryApi, RegistryService};
pub use store::{StoreApi, StoreService};
