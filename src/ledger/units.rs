//! Fixed-point conversion between raw smallest-unit integers and decimal strings.

use super::LedgerError;

/// Largest precision whose scale `10^decimals` still fits in a `u64`.
pub const MAX_DECIMALS: u32 = 19;

/// Render `raw` with `decimals` fractional digits, trailing zeros trimmed.
///
/// At least one fractional digit is kept, so `5_000_000` at 6 decimals is `"5.0"`.
pub fn format_units(raw: u64, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    if decimals == 0 {
        return raw.to_string();
    }
    let scale = 10u128.pow(decimals);
    let (whole, frac) = (raw as u128 / scale, raw as u128 % scale);
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    let trimmed = frac.trim_end_matches('0');
    format!("{}.{}", whole, if trimmed.is_empty() { "0" } else { trimmed })
}

/// Parse a non-negative decimal amount into smallest units.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u64, LedgerError> {
    let amount = amount.trim();
    let invalid = || LedgerError::InvalidAmount(amount.to_string());
    if decimals > MAX_DECIMALS {
        return Err(LedgerError::Other(format!("unsupported precision: {} decimals", decimals)));
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(LedgerError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            amount, decimals
        )));
    }

    let scale = 10u64.checked_pow(decimals).ok_or_else(invalid)?;
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
    let frac: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)
}
