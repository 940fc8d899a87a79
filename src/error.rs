// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! HTTP error envelope.
//!
//! Every failure leaves the API as `{"success": false, "message": …}` with a
//! status derived from the typed error. Raw provider payloads never reach a
//! client; only the typed message does (revert reasons pass through
//! verbatim).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::chain::ChainError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        let status = match &err {
            // Validation-shaped failures, business-rule reverts included
            ChainError::TransactionReverted(_)
            | ChainError::AccountNotFound(_)
            | ChainError::Encoding(_)
            | ChainError::InvalidAmount(_)
            | ChainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ChainError::TransactionRejected(_) => StatusCode::BAD_GATEWAY,
            ChainError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ChainError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ChainError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The revert reason itself is the user-facing message
        let message = match err {
            ChainError::TransactionReverted(reason) => reason,
            other => other.to_string(),
        };

        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
