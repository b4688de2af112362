//! Decimal text <-> minor unit conversion.
//!
//! Amounts travel as `u64` minor units. A token with `decimals = 6` stores
//! `10.5` as `10_500_000`. Parsing never rounds: extra fractional digits are
//! an error rather than being truncated away.

use crate::error::AmountError;
use crate::MAX_DECIMALS;

fn unit(decimals: u32) -> Result<u64, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedPrecision(decimals));
    }
    Ok(10u64.pow(decimals))
}

/// Parse an unsigned decimal string into minor units of a token with `decimals` precision.
///
/// Accepts `"10"`, `"10.5"`, `".5"` and `"10."`. Surrounding whitespace is ignored.
pub fn parse_amount(text: &str, decimals: u32) -> Result<u64, AmountError> {
    let unit = unit(decimals)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountError::Malformed(text.to_string()));
    }

    if frac.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            text: text.to_string(),
            decimals,
        });
    }

    let overflow = || AmountError::Overflow(text.to_string());

    let whole_units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| overflow())?
    };

    // Right-pad the fraction to the full precision: "5" at 6 decimals -> 500000
    let frac_units: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse::<u64>().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(unit)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Render minor units with exactly `decimals` fractional digits.
///
/// Precision beyond [`MAX_DECIMALS`] is clamped so display never fails.
pub fn format_amount(amount: u64, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    if decimals == 0 {
        return amount.to_string();
    }
    let unit = 10u64.pow(decimals);
    format!(
        "{}.{:0width$}",
        amount / unit,
        amount % unit,
        width = decimals as usize
    )
}
