// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Revert-reason extraction from provider error payloads.
//!
//! Nodes report contract reverts in two shapes: a human-readable
//! `execution reverted: <reason>` message, or an ABI-encoded `Error(string)`
//! payload (selector `0x08c379a0`) buried somewhere in the error data. This
//! is the single place both shapes are decoded; services never scan provider
//! strings themselves.

use alloy::sol_types::{Revert, SolError};

/// Marker preceding a textual revert reason.
const REVERTED_MARKER: &str = "execution reverted";

/// Hex selector of Solidity's `Error(string)`.
const ERROR_STRING_SELECTOR: &str = "0x08c379a0";

/// Extract the revert reason from a raw provider error string, if present.
///
/// A textual `execution reverted: Producto no disponible` yields
/// `Producto no disponible` verbatim; an ABI-encoded `Error(string)` payload
/// decodes to the same plain string.
pub fn extract_revert_reason(raw: &str) -> Option<String> {
    textual_reason(raw).or_else(|| encoded_reason(raw))
}

/// Extracted reason, or the generic fallback when the payload carries none.
pub fn revert_message(raw: &str) -> String {
    extract_revert_reason(raw).unwrap_or_else(|| "Transaction failed".to_string())
}

fn textual_reason(raw: &str) -> Option<String> {
    let start = raw.find(REVERTED_MARKER)? + REVERTED_MARKER.len();
    let rest = raw[start..].strip_prefix(':').unwrap_or(&raw[start..]);

    let reason: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | ','))
        .collect();
    let reason = reason.trim().to_string();

    (!reason.is_empty()).then_some(reason)
}

fn encoded_reason(raw: &str) -> Option<String> {
    let start = raw.find(ERROR_STRING_SELECTOR)?;
    // Everything hex after the "0x", selector included
    let hex_str: String = raw[start + 2..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();

    let bytes = alloy::hex::decode(&hex_str).ok()?;
    let decoded = Revert::abi_decode(&bytes).ok()?;
    let reason = decoded.reason.trim().to_string();

    (!reason.is_empty()).then_some(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_textual_reason_verbatim() {
        let raw = r#"server returned an error response: error code 3: execution reverted: Producto no disponible"#;
        assert_eq!(
            extract_revert_reason(raw).as_deref(),
            Some("Producto no disponible")
        );
    }

    #[test]
    fn extracts_reason_without_colon() {
        assert_eq!(
            extract_revert_reason("execution reverted Fondos insuficientes").as_deref(),
            Some("Fondos insuficientes")
        );
    }

    #[test]
    fn decodes_abi_encoded_error_string() {
        let encoded = Revert {
            reason: "Producto no disponible".to_string(),
        }
        .abi_encode();
        let raw = format!(
            r#"{{"code":3,"message":"execution reverted","data":"{}"}}"#,
            alloy::hex::encode_prefixed(&encoded)
        );
        assert_eq!(
            extract_revert_reason(&raw).as_deref(),
            Some("Producto no disponible")
        );
    }

    #[test]
    fn textual_reason_wins_over_encoded_payload() {
        let encoded = Revert {
            reason: "Sin stock".to_string(),
        }
        .abi_encode();
        let raw = format!(
            r#"{{"message":"execution reverted: Sin stock","data":"{}"}}"#,
            alloy::hex::encode_prefixed(&encoded)
        );
        assert_eq!(extract_revert_reason(&raw).as_deref(), Some("Sin stock"));
    }

    #[test]
    fn no_reason_yields_fallback_message() {
        assert_eq!(extract_revert_reason("nonce too low"), None);
        assert_eq!(revert_message("nonce too low"), "Transaction failed");
    }

    #[test]
    fn truncated_hex_payload_is_ignored() {
        assert_eq!(extract_revert_reason("data: 0x08c379a0ff"), None);
    }
}
