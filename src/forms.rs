//! Lenient parsing of HTML form values.
//!
//! Forms are not validated server-side. Blank optional fields become `None`,
//! and numbers that do not parse are stored as `None` instead of failing the
//! request.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Trimmed value, or `None` when blank.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn optional_f64(value: Option<&str>) -> Option<f64> {
    parse_number(value)
}

pub fn optional_i32(value: Option<&str>) -> Option<i32> {
    parse_number(value)
}

/// Accepts both `1500.50` and `1500,50`.
pub fn optional_decimal(value: Option<&str>) -> Option<Decimal> {
    let value = value?.trim().replace(',', ".");
    Decimal::from_str(&value).ok()
}

fn parse_number<T: FromStr>(value: Option<&str>) -> Option<T> {
    value?.trim().replace(',', ".").parse().ok()
}
