//! Lenient numeric decoding for documents coming from untrusted stores
//!
//! Orders and menu items may have been written by older clients or by hand
//! into one of the backing stores. Prices and quantities that are missing,
//! `null`, non-numeric strings, or non-finite decode as `0` instead of
//! failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a finite `f64`, or `0.0`
pub fn coerce_f64(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Coerce an arbitrary JSON value into an `i64` (fraction truncated), or `0`
pub fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| coerce_f64(value).trunc() as i64),
        _ => coerce_f64(value).trunc() as i64,
    }
}

/// Deserialize `f64`, treating anything that is not a finite number as 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(|v| v.as_ref().map(coerce_f64).unwrap_or(0.0))
}

/// Deserialize `i64`, treating anything that is not a finite number as 0
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(|v| v.as_ref().map(coerce_i64).unwrap_or(0))
}

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(&json!(12.5)), 12.5);
        assert_eq!(coerce_f64(&json!("99.90")), 99.9);
        assert_eq!(coerce_f64(&json!("abc")), 0.0);
        assert_eq!(coerce_f64(&json!(null)), 0.0);
        assert_eq!(coerce_f64(&json!({"amount": 3})), 0.0);
    }

    #[test]
    fn test_coerce_i64() {
        assert_eq!(coerce_i64(&json!(3)), 3);
        assert_eq!(coerce_i64(&json!(2.9)), 2);
        assert_eq!(coerce_i64(&json!("4")), 4);
        assert_eq!(coerce_i64(&json!(true)), 0);
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_f64")]
        price: f64,
        #[serde(default, deserialize_with = "lenient_i64")]
        quantity: i64,
        #[serde(default, deserialize_with = "bool_false")]
        paid: bool,
    }

    #[test]
    fn test_lenient_fields() {
        let p: Probe =
            serde_json::from_value(json!({"price": "n/a", "quantity": null, "paid": null}))
                .unwrap();
        assert_eq!(p.price, 0.0);
        assert_eq!(p.quantity, 0);
        assert!(!p.paid);

        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.price, 0.0);
        assert_eq!(p.quantity, 0);
    }
}
