// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! In-memory sessions.
//!
//! Login is by wallet address, checked against the on-chain registry; the
//! server never holds end-user keys. Sessions live only in process memory
//! (no durability across restarts) and ride in the `Authorization: Bearer`
//! header.
//!
//! Use the [`CurrentSession`] extractor in handlers that require a login:
//!
//! ```rust,ignore
//! async fn my_handler(CurrentSession(session): CurrentSession) -> impl IntoResponse {
//!     // session.wallet is the logged-in wallet
//! }
//! ```

use std::collections::HashMap;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{error::ApiError, models::Person, state::AppState};

/// Sessions expire this many hours after login.
const SESSION_TTL_HOURS: i64 = 24;

/// A logged-in wallet.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub wallet: String,
    pub person: Person,
    pub created_at: DateTime<Utc>,
}

/// Process-memory session store.
#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a wallet that passed the registry lookup.
    pub fn create(&mut self, wallet: String, person: Person) -> Session {
        self.prune();

        let token = Uuid::new_v4().to_string();
        let session = Session {
            token: token.clone(),
            wallet,
            person,
            created_at: Utc::now(),
        };
        self.sessions.insert(token, session.clone());
        session
    }

    /// Look a session up, treating expired entries as absent.
    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?;
        (Utc::now() - session.created_at < Duration::hours(SESSION_TTL_HOURS))
            .then(|| session.clone())
    }

    pub fn remove(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    fn prune(&mut self) {
        let now = Utc::now();
        self.sessions
            .retain(|_, session| now - session.created_at < Duration::hours(SESSION_TTL_HOURS));
    }
}

/// Extractor for handlers that require a logged-in wallet.
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("Not logged in"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))?;

        let sessions = state.sessions.read().await;
        let session = sessions
            .get(token)
            .ok_or_else(|| ApiError::unauthorized("Session expired or unknown"))?;

        Ok(CurrentSession(session))
    }
}
