//! Deserialization helpers for store-computed numbers.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
}

/// Reads an integer total that the store may report as a double.
///
/// `$sum` yields a double as soon as one summed value is a double, so `3.0`
/// is accepted as `3`. Fractional or out-of-range values are rejected.
pub(crate) fn integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        Number::Float(f) => Err(D::Error::custom(format!(
            "expected an integral total, got {}",
            f
        ))),
    }
}
