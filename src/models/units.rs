//! Base-unit (wei) to display-unit conversion and hex quantity parsing.
//!
//! All arithmetic is done on integers so that round amounts render exactly.

use crate::error::ProcessingError;

/// Decimals between wei and ether
pub const ETHER_DECIMALS: u32 = 18;
/// Decimals between wei and gwei
pub const GWEI_DECIMALS: u32 = 9;

/// Places shown for ether amounts in reports
pub const ETHER_PRECISION: u32 = 8;
/// Places shown for gas prices in reports
pub const GWEI_PRECISION: u32 = 2;

/// Wei as ether with 8 decimal places, e.g. `"1.00000000"`
pub fn format_ether(wei: u128) -> String {
    format_units_fixed(wei, ETHER_DECIMALS, ETHER_PRECISION)
}

/// Wei as gwei with 2 decimal places, e.g. `"1.00"`
pub fn format_gwei(wei: u128) -> String {
    format_units_fixed(wei, GWEI_DECIMALS, GWEI_PRECISION)
}

/// Convert `value` to a unit with `unit_decimals` decimals, rounded half-up to `precision` places
pub fn format_units_fixed(value: u128, unit_decimals: u32, precision: u32) -> String {
    let divisor = 10u128.pow(unit_decimals);
    let mut whole = value / divisor;
    let remainder = value % divisor;

    let fraction = if precision >= unit_decimals {
        remainder * 10u128.pow(precision - unit_decimals)
    } else {
        let step = 10u128.pow(unit_decimals - precision);
        let mut fraction = remainder / step;
        if (remainder % step) * 2 >= step {
            fraction += 1;
            if fraction == 10u128.pow(precision) {
                fraction = 0;
                whole += 1;
            }
        }
        fraction
    };

    if precision == 0 {
        whole.to_string()
    } else {
        format!("{}.{:0width$}", whole, fraction, width = precision as usize)
    }
}

/// Exact conversion with trailing zeros removed, e.g. `"1"`, `"1.5"`, `"0.000000001"`
pub fn format_units_exact(value: u128, unit_decimals: u32) -> String {
    let divisor = 10u128.pow(unit_decimals);
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder == 0 {
        return whole.to_string();
    }

    let digits = format!("{:0width$}", remainder, width = unit_decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

fn strip_hex_prefix(hex_str: &str) -> &str {
    hex_str
        .strip_prefix("0x")
        .or_else(|| hex_str.strip_prefix("0X"))
        .unwrap_or(hex_str)
}

/// Parse an RPC hex quantity into a u64
pub fn parse_quantity_u64(hex_str: &str) -> Result<u64, ProcessingError> {
    let digits = strip_hex_prefix(hex_str);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ProcessingError::QuantityParsing(format!("Failed to parse hex '{}' to u64: {}", hex_str, e)))
}

/// Parse an RPC hex quantity into a u128
pub fn parse_quantity_u128(hex_str: &str) -> Result<u128, ProcessingError> {
    let digits = strip_hex_prefix(hex_str);
    u128::from_str_radix(digits, 16)
        .map_err(|e| ProcessingError::QuantityParsing(format!("Failed to parse hex '{}' to u128: {}", hex_str, e)))
}
