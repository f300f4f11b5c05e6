//! Coercion of raw upstream row values into `Decimal` amounts.
//!
//! Quote and condition rows arrive from the host as loosely typed JSON.
//! `Lenient` reproduces the host's historical tolerance (null, absent, and
//! malformed values become zero); `Strict` surfaces the same cases as
//! [`NumericError`] for ingestion paths that must reject corrupt rows.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::NumericError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoercionPolicy {
    #[default]
    Lenient,
    Strict,
}

pub fn or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

pub fn decimal_from_f64(value: f64, policy: CoercionPolicy) -> Result<Decimal, NumericError> {
    if !value.is_finite() {
        return match policy {
            CoercionPolicy::Lenient => Ok(Decimal::ZERO),
            CoercionPolicy::Strict => Err(NumericError::NonFinite),
        };
    }

    match Decimal::from_f64(value) {
        Some(amount) => Ok(amount),
        None => match policy {
            CoercionPolicy::Lenient => Ok(Decimal::ZERO),
            CoercionPolicy::Strict => Err(NumericError::Unrepresentable),
        },
    }
}

pub fn decimal_from_json(value: &Value, policy: CoercionPolicy) -> Result<Decimal, NumericError> {
    match value {
        Value::Null => match policy {
            CoercionPolicy::Lenient => Ok(Decimal::ZERO),
            CoercionPolicy::Strict => Err(NumericError::Null),
        },
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(Decimal::from(int));
            }
            if let Some(int) = number.as_u64() {
                return Ok(Decimal::from(int));
            }
            match number.as_f64() {
                Some(float) => decimal_from_f64(float, policy),
                None => match policy {
                    CoercionPolicy::Lenient => Ok(Decimal::ZERO),
                    CoercionPolicy::Strict => Err(NumericError::Unrepresentable),
                },
            }
        }
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return match policy {
                    CoercionPolicy::Lenient => Ok(Decimal::ZERO),
                    CoercionPolicy::Strict => Err(NumericError::Malformed { raw: raw.clone() }),
                };
            }
            match trimmed.parse::<Decimal>() {
                Ok(amount) => Ok(amount),
                Err(_) => match policy {
                    CoercionPolicy::Lenient => Ok(Decimal::ZERO),
                    CoercionPolicy::Strict => Err(NumericError::Malformed { raw: raw.clone() }),
                },
            }
        }
        Value::Bool(_) => unsupported("bool", policy),
        Value::Array(_) => unsupported("array", policy),
        Value::Object(_) => unsupported("object", policy),
    }
}

/// Like [`decimal_from_json`] but preserves absence: a JSON null stays `None`
/// instead of collapsing to zero. Used for fields where "never negotiated"
/// and "negotiated down to zero" mean different things.
pub fn optional_decimal_from_json(
    value: &Value,
    policy: CoercionPolicy,
) -> Result<Option<Decimal>, NumericError> {
    if value.is_null() {
        return Ok(None);
    }
    decimal_from_json(value, policy).map(Some)
}

fn unsupported(kind: &'static str, policy: CoercionPolicy) -> Result<Decimal, NumericError> {
    match policy {
        CoercionPolicy::Lenient => Ok(Decimal::ZERO),
        CoercionPolicy::Strict => Err(NumericError::UnsupportedType { kind }),
    }
}
