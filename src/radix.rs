//! Decoding share values written as digit strings in an arbitrary radix.

use crate::error::{ReconstructionError, Result};
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

fn check_radix(radix: u32) -> Result<()> {
    if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
        return Err(ReconstructionError::InvalidRadix { radix });
    }
    Ok(())
}

/// Decode `digits` as a non-negative integer in base `radix`.
///
/// Digits are `0-9` then `a-z` (case-insensitive) for the values 10..=35.
/// The string is read most significant digit first, accumulating
/// `result = result * radix + digit`, so the value is exact at any length.
///
/// # Errors
/// * [`ReconstructionError::InvalidRadix`] if `radix` is not in `2..=36`
/// * [`ReconstructionError::EmptyDigits`] if `digits` is empty
/// * [`ReconstructionError::InvalidDigit`] on the first character that is not
///   alphanumeric or whose value is not below `radix`
pub fn decode(digits: &str, radix: u32) -> Result<BigInt> {
    check_radix(radix)?;
    if digits.is_empty() {
        return Err(ReconstructionError::EmptyDigits);
    }

    let mut result = BigUint::zero();
    for (position, c) in digits.chars().enumerate() {
        let value = c
            .to_digit(MAX_RADIX)
            .filter(|&v| v < radix)
            .ok_or(ReconstructionError::InvalidDigit {
                digit: c,
                position,
                radix,
            })?;
        result = result * radix + value;
    }
    Ok(BigInt::from(result))
}

/// Render a non-negative integer in base `radix` with lowercase digits.
pub fn encode(value: &BigInt, radix: u32) -> Result<String> {
    check_radix(radix)?;
    if value.is_negative() {
        return Err(ReconstructionError::NegativeValue {
            value: value.clone(),
        });
    }
    Ok(value.to_str_radix(radix))
}
