// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Session endpoints: login by wallet, logout.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    models::{LoginRequest, LoginResponse, LogoutResponse},
    sessions::CurrentSession,
    state::AppState,
};

/// Log in with a wallet address.
///
/// The wallet must exist in the on-chain personnel registry; no password or
/// key material is involved server-side.
#[utoipa::path(
    post,
    path = "/api/session/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Wallet not registered"),
        (status = 503, description = "Chain unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let person = state
        .registry
        .person_by_wallet(&request.wallet)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Wallet not registered"))?;

    let session = state
        .sessions
        .write()
        .await
        .create(request.wallet, person.clone());

    tracing::info!(wallet = %session.wallet, "session opened");

    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        person,
    }))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/session/logout",
    tag = "Session",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Session dropped", body = LogoutResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<LogoutResponse> {
    state.sessions.write().await.remove(&session.token);
    tracing::info!(wallet = %session.wallet, "session closed");
    Json(LogoutResponse { success: true })
}
