// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{PayoutApi, RegistryApi, StoreApi};
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreApi>,
    pub registry: Arc<dyn RegistryApi>,
    pub payout: Arc<dyn PayoutApi>,
    pub sessions: Arc<RwLock<SessionStore>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StoreApi>,
        registry: Arc<dyn RegistryApi>,
        payout: Arc<dyn PayoutApi>,
    ) -> Self {
        Self {
            store,
            registry,
            payout,
            sessions: Arc::new(RwLock::new(SessionStore::new())),
        }
    }
}
