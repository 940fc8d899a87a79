// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Decimal amount conversions between human-readable strings and wei.
//!
//! Product prices and payout amounts cross the API boundary as decimal
//! strings ("0.005") and reach the chain as wei. Conversions are exact: a
//! parse followed by a format returns the same decimal value, with no
//! precision loss anywhere in between.

use alloy::primitives::U256;

use super::error::ChainError;

/// Decimals of the native token.
pub const NATIVE_DECIMALS: u8 = 18;

/// Parse a human-readable decimal string into wei.
///
/// Accepts an optional fractional part of up to [`NATIVE_DECIMALS`] digits.
pub fn parse_native(amount: &str) -> Result<U256, ChainError> {
    parse_units(amount, NATIVE_DECIMALS)
}

/// Parse a decimal string into the smallest unit for the given decimals.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let amount = amount.trim();
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 {
        return Err(ChainError::InvalidAmount(format!(
            "`{amount}` is not a decimal number"
        )));
    }

    let whole = parts[0].parse::<u128>().map_err(|_| {
        ChainError::InvalidAmount(format!("`{amount}` has an invalid whole part"))
    })?;

    let fraction = if parts.len() == 2 {
        let frac_str = parts[1];
        if frac_str.len() > decimals as usize {
            return Err(ChainError::InvalidAmount(format!(
                "`{amount}` has more than {decimals} decimal places"
            )));
        }
        // Pad with zeros up to the full precision
        let padded = format!("{frac_str:0<width$}", width = decimals as usize);
        padded.parse::<u128>().map_err(|_| {
            ChainError::InvalidAmount(format!("`{amount}` has an invalid fractional part"))
        })?
    } else {
        0u128
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    Ok(U256::from(whole) * multiplier + U256::from(fraction))
}

/// Format wei back into a human-readable decimal string.
///
/// Trailing zeros of the fractional part are dropped; the full precision is
/// kept otherwise, so `format_native(parse_native(s))` round-trips exactly.
pub fn format_native(amount: U256) -> String {
    format_units(amount, NATIVE_DECIMALS)
}

/// Format a smallest-unit quantity with the given decimals.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{remainder:0>width$}", width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{whole}.{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_amount() {
        assert_eq!(
            parse_native("1").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_fractional_amount() {
        assert_eq!(
            parse_native("0.005").unwrap(),
            U256::from(5_000_000_000_000_000u64)
        );
        assert_eq!(
            parse_native("1.5").unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_smallest_representable() {
        assert_eq!(
            parse_native("0.000000000000000001").unwrap(),
            U256::from(1u64)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_native("").is_err());
        assert!(parse_native("abc").is_err());
        assert!(parse_native("1.2.3").is_err());
        assert!(parse_native("-1").is_err());
    }

    #[test]
    fn parse_rejects_excess_precision() {
        // 19 fractional digits cannot be represented in wei
        assert!(parse_native("0.0000000000000000001").is_err());
    }

    #[test]
    fn format_drops_trailing_zeros() {
        assert_eq!(format_native(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_native(U256::from(1_000_000_000_000_000_000u64)), "1");
        assert_eq!(format_native(U256::ZERO), "0");
    }

    #[test]
    fn round_trip_is_exact() {
        for s in ["0.005", "1.5", "42", "0.000000000000000001", "123.456789012345678"] {
            let wei = parse_native(s).unwrap();
            assert_eq!(format_native(wei), s, "round trip of {s}");
        }
    }

    #[test]
    fn token_units_round_trip() {
        let raw = parse_units("1.5", 6).unwrap();
        assert_eq!(raw, U256::from(1_500_000u64));
        assert_eq!(format_units(raw, 6), "1.5");
    }
}
