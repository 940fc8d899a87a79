// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Contract ABI artifacts and dynamic call encoding.
//!
//! Method names and argument lists arrive at the gateway as opaque values
//! checked against a JSON ABI build artifact, so the bindings are dynamic
//! (`dyn-abi`) rather than generated with the `sol!` macro. Mismatches
//! surface as [`ChainError::Encoding`] before any network request.

use std::str::FromStr;

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};

use super::error::ChainError;

/// A deployed contract: display name, on-chain address and parsed ABI.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    name: &'static str,
    address: Address,
    abi: JsonAbi,
}

impl ContractArtifact {
    /// Parse an embedded ABI artifact (the `abi` array of a build output)
    /// and bind it to the configured contract address.
    pub fn parse(name: &'static str, address: &str, abi_json: &str) -> Result<Self, ChainError> {
        let address = Address::from_str(address.trim()).map_err(|e| {
            ChainError::Configuration(format!("bad {name} contract address: {e}"))
        })?;

        let abi: JsonAbi = serde_json::from_str(abi_json).map_err(|e| {
            ChainError::Configuration(format!("bad {name} ABI artifact: {e}"))
        })?;

        Ok(Self { name, address, abi })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// ABI-encode `method(args…)` into calldata (selector included).
    pub fn encode_call(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes, ChainError> {
        let function = self.function(method)?;
        let data = function.abi_encode_input(args).map_err(|e| {
            ChainError::Encoding(format!(
                "arguments for `{method}` do not match the {} ABI: {e}",
                self.name
            ))
        })?;
        Ok(data.into())
    }

    /// Decode the raw return data of `method`.
    pub fn decode_output(&self, method: &str, data: &[u8]) -> Result<Vec<DynSolValue>, ChainError> {
        let function = self.function(method)?;
        function.abi_decode_output(data).map_err(|e| {
            ChainError::Encoding(format!(
                "could not decode `{method}` output from the {} contract: {e}",
                self.name
            ))
        })
    }

    // These contracts do not overload; the first entry wins.
    fn function(&self, method: &str) -> Result<&Function, ChainError> {
        self.abi
            .function(method)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| {
                ChainError::Encoding(format!(
                    "method `{method}` is not present in the {} ABI",
                    self.name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    const TEST_ABI: &str = r#"[
        {
            "type": "function",
            "name": "release",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "payee", "type": "address" }],
            "outputs": []
        },
        {
            "type": "function",
            "name": "getBalance",
            "stateMutability": "view",
            "inputs": [],
            "outputs": [{ "name": "", "type": "uint256" }]
        }
    ]"#;

    const ADDR: &str = "0x76568BEd5Acf1A5Cd888773C8cAe9ea2a9131A63";

    fn artifact() -> ContractArtifact {
        ContractArtifact::parse("payout", ADDR, TEST_ABI).unwrap()
    }

    #[test]
    fn parse_rejects_bad_address() {
        let err = ContractArtifact::parse("payout", "not-an-address", TEST_ABI).unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn encode_includes_selector() {
        let payee = Address::from_str(ADDR).unwrap();
        let data = artifact()
            .encode_call("release", &[DynSolValue::Address(payee)])
            .unwrap();
        // 4-byte selector + one 32-byte word
        assert_eq!(data.len(), 36);
    }

    #[test]
    fn unknown_method_is_an_encoding_error() {
        let err = artifact().encode_call("selfdestructAll", &[]).unwrap_err();
        assert!(matches!(err, ChainError::Encoding(_)));
        assert!(err.to_string().contains("selfdestructAll"));
    }

    #[test]
    fn argument_mismatch_is_an_encoding_error() {
        let err = artifact()
            .encode_call("release", &[DynSolValue::Uint(U256::from(1u64), 256)])
            .unwrap_err();
        assert!(matches!(err, ChainError::Encoding(_)));
    }

    #[test]
    fn decode_round_trips_uint_output() {
        let word = DynSolValue::Uint(U256::from(42u64), 256).abi_encode();
        let decoded = artifact().decode_output("getBalance", &word).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].as_uint().unwrap().0, U256::from(42u64));
    }
}
