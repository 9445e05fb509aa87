//! Amount Normalizer
//!
//! Converts raw integer token amounts into exact decimal quantities.
//! Corrupted or adversarial values map to zero instead of failing.

use rust_decimal::Decimal;

use crate::models::types::TransferRecord;
use crate::utils::constants::MAX_EVENT_AMOUNT;

/// Significant digits a `Decimal` mantissa can always hold
const MAX_MANTISSA_DIGITS: usize = 28;

/// Largest scale `Decimal` supports
const MAX_SCALE: usize = 28;

/// `raw_value / 10^decimals` bounded by the default 10^12 sanity limit
pub fn normalize(raw_value: &str, decimals: u32) -> Decimal {
    normalize_bounded(raw_value, decimals, Decimal::from(MAX_EVENT_AMOUNT))
}

/// `raw_value / 10^decimals`, or zero when the input is not a plain
/// non-negative integer or the result is `<= 0` or `> max`.
///
/// Digits past the 28th significant digit are dropped from the fractional
/// tail; the integer part is never approximated.
pub fn normalize_bounded(raw_value: &str, decimals: u32, max: Decimal) -> Decimal {
    let trimmed = raw_value.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    let scale = decimals as usize;
    let integer_digits = digits.len().saturating_sub(scale);
    if integer_digits > MAX_MANTISSA_DIGITS {
        return Decimal::ZERO;
    }

    // Trim the fractional tail until both mantissa and scale fit
    let mut dropped = digits.len().saturating_sub(MAX_MANTISSA_DIGITS);
    if scale.saturating_sub(dropped) > MAX_SCALE {
        dropped = scale - MAX_SCALE;
    }
    if dropped >= digits.len() {
        return Decimal::ZERO;
    }

    let mantissa = match digits[..digits.len() - dropped].parse::<i128>() {
        Ok(m) => m,
        Err(_) => return Decimal::ZERO,
    };

    let amount = match Decimal::try_from_i128_with_scale(mantissa, (scale - dropped) as u32) {
        Ok(amount) => amount,
        Err(_) => return Decimal::ZERO,
    };

    if amount <= Decimal::ZERO || amount > max {
        Decimal::ZERO
    } else {
        amount
    }
}

/// Normalized amount of a transfer; malformed decimals count as zero
#[inline]
pub fn transfer_amount(record: &TransferRecord, max: Decimal) -> Decimal {
    match record.decimals {
        Some(decimals) => normalize_bounded(&record.raw_value, decimals, max),
        None => Decimal::ZERO,
    }
}
