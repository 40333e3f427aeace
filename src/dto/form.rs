//! Helpers for turning raw HTML form fields into typed values. Browsers send
//! empty inputs as empty strings, so every field arrives as `Option<String>`.

use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Trimmed value, `None` when missing or blank.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required(value: Option<String>, field: &str) -> AppResult<String> {
    optional(value).ok_or_else(|| AppError::validation(format!("{field} is required")))
}

pub fn optional_number<T: FromStr>(value: Option<String>, field: &str) -> AppResult<Option<T>> {
    optional(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::validation(format!("{field} must be a number")))
        })
        .transpose()
}

pub fn required_number<T: FromStr>(value: Option<String>, field: &str) -> AppResult<T> {
    optional_number(value, field)?
        .ok_or_else(|| AppError::validation(format!("{field} is required")))
}

/// Parses a price such as `12`, `12.5` or `12.50` into minor units.
pub fn price_in_cents(value: Option<String>, field: &str) -> AppResult<i64> {
    let Some(raw) = optional(value) else {
        return Ok(0);
    };
    let invalid = || AppError::validation(format!("{field} must be a non-negative amount"));

    let (whole, fraction) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
    // Digits only on both sides; `parse` alone would accept a sign.
    if fraction.len() > 2
        || !fraction.chars().all(|c| c.is_ascii_digit())
        || !whole.chars().all(|c| c.is_ascii_digit())
        || (whole.is_empty() && fraction.is_empty())
    {
        return Err(invalid());
    }
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(optional(Some("   ".into())), None);
        assert_eq!(optional(Some(" Honda ".into())), Some("Honda".into()));
        assert!(required(None, "make").is_err());
    }

    #[test]
    fn numbers_are_validated() {
        assert_eq!(optional_number::<i32>(Some("".into()), "year").unwrap(), None);
        assert_eq!(optional_number::<i32>(Some("2004".into()), "year").unwrap(), Some(2004));
        assert!(optional_number::<i32>(Some("two".into()), "year").is_err());
        assert!(required_number::<i32>(None, "mechanic_id").is_err());
    }

    #[test]
    fn prices_become_cents() {
        assert_eq!(price_in_cents(None, "unit_price").unwrap(), 0);
        assert_eq!(price_in_cents(Some("12".into()), "unit_price").unwrap(), 1200);
        assert_eq!(price_in_cents(Some("12.5".into()), "unit_price").unwrap(), 1250);
        assert_eq!(price_in_cents(Some("0.99".into()), "unit_price").unwrap(), 99);
        assert!(price_in_cents(Some("1.999".into()), "unit_price").is_err());
        assert!(price_in_cents(Some("-3".into()), "unit_price").is_err());
        assert!(price_in_cents(Some("-0.50".into()), "unit_price").is_err());
        assert!(price_in_cents(Some("+5".into()), "unit_price").is_err());
        assert_eq!(price_in_cents(Some(".5".into()), "unit_price").unwrap(), 50);
        assert!(price_in_cents(Some("abc".into()), "unit_price").is_err());
    }
}
