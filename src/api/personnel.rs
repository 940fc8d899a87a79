// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Personnel endpoints over the on-chain registry.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{
        NewPersonRequest, PersonResponse, PersonsResponse, SetPersonActiveRequest, TxResponse,
        UpdateBasicDataRequest, UpdateRoleRequest, UpdateSalaryRequest,
    },
    state::AppState,
};

/// Person registered under a wallet address.
#[utoipa::path(
    get,
    path = "/api/personnel/wallet/{wallet}",
    tag = "Personnel",
    params(("wallet" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 404, description = "Wallet not registered")
    )
)]
pub async fn person_by_wallet(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<PersonResponse>, ApiError> {
    let person = state
        .registry
        .person_by_wallet(&wallet)
        .await?
        .ok_or_else(|| ApiError::not_found("Wallet not registered"))?;

    Ok(Json(PersonResponse {
        success: true,
        person,
    }))
}

/// Every registered person.
#[utoipa::path(
    get,
    path = "/api/personnel",
    tag = "Personnel",
    responses(
        (status = 200, description = "Personnel list", body = PersonsResponse),
        (status = 503, description = "Chain unavailable")
    )
)]
pub async fn list_persons(State(state): State<AppState>) -> Result<Json<PersonsResponse>, ApiError> {
    let persons = state.registry.all_persons().await?;
    Ok(Json(PersonsResponse {
        success: true,
        persons,
    }))
}

/// Register a person, signed by the admin account.
#[utoipa::path(
    post,
    path = "/api/personnel",
    tag = "Personnel",
    request_body = NewPersonRequest,
    responses(
        (status = 200, description = "Person created", body = TxResponse),
        (status = 400, description = "Invalid wallet/salary or contract revert")
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    Json(request): Json<NewPersonRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.registry.create_person(request).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

#[utoipa::path(
    put,
    path = "/api/personnel/{id}/role",
    tag = "Personnel",
    params(("id" = u64, Path, description = "Person id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = TxResponse),
        (status = 400, description = "Contract revert")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.registry.update_role(id, &request.role).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

#[utoipa::path(
    put,
    path = "/api/personnel/{id}/salary",
    tag = "Personnel",
    params(("id" = u64, Path, description = "Person id")),
    request_body = UpdateSalaryRequest,
    responses(
        (status = 200, description = "Salary updated", body = TxResponse),
        (status = 400, description = "Invalid salary or contract revert")
    )
)]
pub async fn update_salary(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateSalaryRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.registry.update_salary(id, &request.salary).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

#[utoipa::path(
    put,
    path = "/api/personnel/{id}/active",
    tag = "Personnel",
    params(("id" = u64, Path, description = "Person id")),
    request_body = SetPersonActiveRequest,
    responses(
        (status = 200, description = "Status updated", body = TxResponse),
        (status = 400, description = "Contract revert")
    )
)]
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<SetPersonActiveRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.registry.set_active(id, request.active).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

#[utoipa::path(
    put,
    path = "/api/personnel/{id}/basic",
    tag = "Personnel",
    params(("id" = u64, Path, description = "Person id")),
    request_body = UpdateBasicDataRequest,
    responses(
        (status = 200, description = "Basic data updated", body = TxResponse),
        (status = 400, description = "Contract revert")
    )
)]
pub async fn update_basic_data(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateBasicDataRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.registry.update_basic_data(id, request).await?;
    Ok(Json(TxResponse::mined(receipt)))
}
