// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Store endpoints: product catalogue, purchases, contract funds.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{
        BalanceResponse, NewProductRequest, ProductsResponse, PurchasesResponse,
        RegisterPurchaseRequest, SetProductActiveRequest, TxResponse, UpdateProductRequest,
        WithdrawRequest,
    },
    sessions::CurrentSession,
    state::AppState,
};

/// List the catalogue. Public; inactive products are included so sellers can
/// see their full inventory.
#[utoipa::path(
    get,
    path = "/api/store/products",
    tag = "Store",
    responses(
        (status = 200, description = "Product list", body = ProductsResponse),
        (status = 503, description = "Chain unavailable")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state.store.products().await?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// Create a product, signed by the admin account.
#[utoipa::path(
    post,
    path = "/api/store/products",
    tag = "Store",
    request_body = NewProductRequest,
    responses(
        (status = 200, description = "Product created", body = TxResponse),
        (status = 400, description = "Invalid price or contract revert")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<NewProductRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.store.add_product(request).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Update every field of a product, `active` included.
#[utoipa::path(
    put,
    path = "/api/store/products/{id}",
    tag = "Store",
    params(("id" = u64, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = TxResponse),
        (status = 400, description = "Invalid input or contract revert")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.store.update_product(id, request).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Toggle a product's availability without touching its other fields.
#[utoipa::path(
    post,
    path = "/api/store/products/{id}/active",
    tag = "Store",
    params(("id" = u64, Path, description = "Product id")),
    request_body = SetProductActiveRequest,
    responses(
        (status = 200, description = "Availability changed", body = TxResponse),
        (status = 400, description = "Contract revert")
    )
)]
pub async fn set_product_active(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<SetProductActiveRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.store.set_product_active(id, request.active).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/store/products/{id}",
    tag = "Store",
    params(("id" = u64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = TxResponse),
        (status = 400, description = "Contract revert")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.store.delete_product(id).await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Purchases of the logged-in wallet.
#[utoipa::path(
    get,
    path = "/api/store/purchases",
    tag = "Store",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Purchase list", body = PurchasesResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<PurchasesResponse>, ApiError> {
    let purchases = state.store.purchases_by_user(&session.wallet).await?;
    Ok(Json(PurchasesResponse {
        success: true,
        purchases,
    }))
}

/// Record a purchase for the logged-in wallet.
#[utoipa::path(
    post,
    path = "/api/store/purchases",
    tag = "Store",
    security(("bearer" = [])),
    request_body = RegisterPurchaseRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = TxResponse),
        (status = 400, description = "Invalid amount or contract revert"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn register_purchase(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(request): Json<RegisterPurchaseRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state
        .store
        .register_purchase(&session.wallet, request.product_id, &request.amount)
        .await?;
    Ok(Json(TxResponse::mined(receipt)))
}

/// Native balance held by the store contract.
#[utoipa::path(
    get,
    path = "/api/store/balance",
    tag = "Store",
    responses(
        (status = 200, description = "Contract balance", body = BalanceResponse),
        (status = 503, description = "Chain unavailable")
    )
)]
pub async fn contract_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.store.contract_balance().await?;
    Ok(Json(BalanceResponse {
        success: true,
        balance,
    }))
}

/// Withdraw funds from the store contract to the admin address.
#[utoipa::path(
    post,
    path = "/api/store/withdraw",
    tag = "Store",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal mined", body = TxResponse),
        (status = 400, description = "Invalid amount or contract revert")
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<TxResponse>, ApiError> {
    let receipt = state.store.withdraw(&request.amount).await?;
    Ok(Json(TxResponse::mined(receipt)))
}
