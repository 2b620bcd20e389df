use crate::core::{AppError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

/// Minor units per major unit (centavos per real)
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Parses a minor-unit amount string, dropping any fractional part
///
/// Gateways receive amounts as integers of the smallest unit, so `"10050.9"`
/// is read as `10050`.
pub fn parse_minor_units(amount: &str) -> Result<Decimal> {
    let value = Decimal::from_str(amount.trim())
        .map_err(|e| AppError::validation(format!("Invalid amount '{}': {}", amount, e)))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!(
            "Amount cannot be negative: {}",
            amount
        )));
    }

    Ok(value.trunc())
}

/// Converts a minor-unit amount (`"10050"`) into major units (`100.5`)
pub fn minor_to_major(amount: &str) -> Result<Decimal> {
    let minor = parse_minor_units(amount)?;
    Ok((minor / Decimal::from(MINOR_UNITS_PER_MAJOR)).normalize())
}

/// Renders a major-unit amount as a JSON number
///
/// Whole amounts stay integers (`100`, not `100.0`) so the wire value matches
/// the text used for signing.
pub fn to_json_number(amount: Decimal) -> Result<Value> {
    let amount = amount.normalize();
    if amount.scale() == 0 {
        if let Some(whole) = amount.to_i64() {
            return Ok(Value::from(whole));
        }
    }

    amount
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| AppError::validation(format!("Amount out of range: {}", amount)))
}
