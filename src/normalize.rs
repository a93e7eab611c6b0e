// 🔢 Input Normalization - raw keystrokes → Decimal
// Locale-invariant decimal syntax; anything else collapses to zero.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Exponents beyond this magnitude cannot produce a representable non-zero value
const MAX_EXPONENT: i64 = 60;

const TEN: Decimal = Decimal::TEN;

/// Normalize free-form text into a number
///
/// Total over all inputs: empty, non-numeric or malformed text (and values
/// outside the Decimal range) become `0`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use tip_time::normalize_number;
///
/// assert_eq!(normalize_number("12.5"), Decimal::new(125, 1));
/// assert_eq!(normalize_number("abc"), Decimal::ZERO);
/// ```
pub fn normalize_number(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Strict parse: `None` when the text is not a well-formed decimal number
///
/// Accepted: optional `+`/`-`, digits with an optional fractional part
/// (`12`, `12.5`, `.5`, `12.`), optional exponent (`1.5e3`, `2E-2`).
/// Surrounding ASCII whitespace is ignored.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());

    let (negative, unsigned) = match trimmed.as_bytes().first()? {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !is_digits(int_part) || !is_digits(frac_part) {
        return None;
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
    let mut value = Decimal::from_str(&format!("{}.{}", int_part, frac_part)).ok()?;

    if let Some(exp) = exponent {
        value = apply_exponent(value, parse_exponent(exp)?)?;
    }

    if value.is_zero() {
        return Some(Decimal::ZERO);
    }

    Some(if negative { -value } else { value })
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_exponent(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !is_digits(digits) {
        return None;
    }

    // Saturate instead of failing: "1e99999999999999999999" is syntactically valid
    let magnitude = digits
        .trim_start_matches('0')
        .parse::<i64>()
        .unwrap_or(if digits.trim_start_matches('0').is_empty() { 0 } else { i64::MAX });

    Some(if negative { -magnitude } else { magnitude })
}

fn apply_exponent(value: Decimal, exp: i64) -> Option<Decimal> {
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }

    if exp > MAX_EXPONENT {
        return None;
    }
    if exp < -MAX_EXPONENT {
        // Below the smallest representable magnitude
        return Some(Decimal::ZERO);
    }

    let mut result = value;
    if exp >= 0 {
        for _ in 0..exp {
            result = result.checked_mul(TEN)?;
        }
    } else {
        for _ in 0..exp.unsigned_abs() {
            result = result.checked_div(TEN)?;
        }
    }
    Some(result)
}

// ============================================================================
// TESTS
// ============================================================================
