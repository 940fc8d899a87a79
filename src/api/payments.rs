// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Payout endpoints over the splitter contract.
//!
//! The optional `account` field of these requests selects a roster entry
//! (operational keys only); it is never an end-user identity.

use axum::{extract::State, Json};

use crate::{
    chain::AccountSelector,
    error::ApiError,
    models::{
        BalanceResponse, DepositRequest, ReleaseAllResponse, ReleaseRequest, TxResponse,
    },
    state::AppState,
};

/// Deposit native funds into the splitter.
#[utoipa::path(
    post,
    path = "/api/payments/deposit",
    tag = "Payments",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit mined", body = TxResponse),
        (status = 400, description = "Invalid amount, unknown account or revert")
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let selector = AccountSelector::from(request.account);
    let receipt = state.payout.deposit(&request.amount, selector).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Release the selected account's accrued share.
#[utoipa::path(
    post,
    path = "/api/payments/release",
    tag = "Payments",
    request_body = ReleaseRequest,
    responses(
        (status = 200, description = "Release mined", body = TxResponse),
        (status = 400, description = "Unknown account or contract revert")
    )
)]
pub async fn release(
    State(state): State<AppState>,
    Json(request): Json<ReleaseRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let selector = AccountSelector::from(request.account);
    let receipt = state.payout.release(selector).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Release every known payee's share, signed by the admin.
#[utoipa::path(
    post,
    path = "/api/payments/release-all",
    tag = "Payments",
    responses(
        (status = 200, description = "All shares released", body = ReleaseAllResponse),
        (status = 400, description = "A release reverted")
    )
)]
pub async fn release_all(
    State(state): State<AppState>,
) -> Result<Json<ReleaseAllResponse>, ApiError> {
    let released = state.payout.release_all().await?;
    Ok(Json(ReleaseAllResponse {
        success: true,
        released,
    }))
}

/// Funds currently held by the splitter contract.
#[utoipa::path(
    get,
    path = "/api/payments/balance",
    tag = "Payments",
    responses(
        (status = 200, description = "Splitter balance", body = BalanceResponse),
        (status = 503, description = "Chain unavailable")
    )
)]
pub async fn balance(State(state): State<AppState>) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.payout.balance().await?;
    Ok(Json(BalanceResponse {
        success: true,
        balance,
    }))
}
