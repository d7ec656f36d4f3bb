//! Field coercion for star documents.
//!
//! Catalog files come out of a CSV conversion where every value may arrive as a
//! string, a number, `null` or not at all. These helpers accept any JSON value
//! and fall back to the zero value instead of failing the record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn number<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_f64(&Value::deserialize(de)?))
}

pub(crate) fn id<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_i64(&Value::deserialize(de)?))
}

pub(crate) fn string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

pub fn coerce_f64(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_f64(s),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

pub fn coerce_i64(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().unwrap_or_else(|_| parse_f64(s) as i64)
        }
        _ => 0,
    }
}

/// Parses a decimal number, returning `0` for anything unparseable.
pub fn parse_f64(s: &str) -> f64 {
    match s.trim().trim_matches('"').parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
