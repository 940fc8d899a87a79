// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Helpers for unpacking dynamically-decoded contract return values.
//!
//! The gateway hands back `DynSolValue` trees; these helpers convert tuple
//! fields into concrete types, turning any shape mismatch into an
//! [`ChainError::Encoding`] that names what was being decoded.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};

use crate::chain::ChainError;

/// The single return value of a call that outputs exactly one item.
pub fn single<'a>(outputs: &'a [DynSolValue], what: &str) -> Result<&'a DynSolValue, ChainError> {
    match outputs {
        [value] => Ok(value),
        _ => Err(shape(what, "a single return value")),
    }
}

pub fn array<'a>(value: &'a DynSolValue, what: &str) -> Result<&'a [DynSolValue], ChainError> {
    value.as_array().ok_or_else(|| shape(what, "an array"))
}

pub fn tuple<'a>(value: &'a DynSolValue, what: &str) -> Result<&'a [DynSolValue], ChainError> {
    value.as_tuple().ok_or_else(|| shape(what, "a tuple"))
}

pub fn uint(fields: &[DynSolValue], index: usize, what: &str) -> Result<U256, ChainError> {
    fields
        .get(index)
        .and_then(|f| f.as_uint())
        .map(|(value, _bits)| value)
        .ok_or_else(|| shape(what, "a uint field"))
}

pub fn string(fields: &[DynSolValue], index: usize, what: &str) -> Result<String, ChainError> {
    fields
        .get(index)
        .and_then(|f| f.as_str())
        .map(str::to_string)
        .ok_or_else(|| shape(what, "a string field"))
}

pub fn boolean(fields: &[DynSolValue], index: usize, what: &str) -> Result<bool, ChainError> {
    fields
        .get(index)
        .and_then(|f| f.as_bool())
        .ok_or_else(|| shape(what, "a bool field"))
}

pub fn address(fields: &[DynSolValue], index: usize, what: &str) -> Result<Address, ChainError> {
    fields
        .get(index)
        .and_then(|f| f.as_address())
        .ok_or_else(|| shape(what, "an address field"))
}

fn shape(what: &str, expected: &str) -> ChainError {
    ChainError::Encoding(format!("expected {expected} while decoding {what}"))
}
