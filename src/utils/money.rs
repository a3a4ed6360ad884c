//! Amount handling in integer minor units (cents).
//!
//! The ledger never stores floating point; user input is parsed straight
//! into cents and only formatted back to a decimal string for display.

/// Parse a user-entered amount like `"12.34"`, `"12,34"` or `"15"` into
/// minor units. Accepts at most two fraction digits and requires the result
/// to be strictly positive. Returns `None` on anything else.
pub fn parse_amount(input: &str) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() || normalized.starts_with('-') || normalized.starts_with('+') {
        return None;
    }

    let (whole, frac) = match normalized.split_once('.') {
        Some((w, f)) => (w, f),
        None => (normalized.as_str(), ""),
    };
    if whole.is_empty() || frac.len() > 2 {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let frac_minor = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse::<i64>().ok()?,
    };

    let minor = whole.checked_mul(100)?.checked_add(frac_minor)?;
    if minor > 0 {
        Some(minor)
    } else {
        None
    }
}

/// Format minor units as a decimal string, e.g. `1234` -> `"12.34"`.
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Even bill split: divide `total` minor units between `member_count`
/// participants and return the per-debtor shares (`member_count - 1`
/// entries; the payer keeps the remaining share). Leftover cents that do
/// not divide evenly go one each to the first debtors in list order, so the
/// allocation is deterministic.
pub fn split_shares(total: i64, member_count: usize) -> Vec<i64> {
    if member_count < 2 || total <= 0 {
        return Vec::new();
    }
    let n = member_count as i64;
    let base = total / n;
    let remainder = total % n;

    (0..n - 1)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}
