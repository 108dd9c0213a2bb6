//! Remote product normalization.
//!
//! Converts raw product JSON into [`RemoteStockRecord`]s. Records without a
//! code or a name are dropped silently; they are not errors.
//!
//! ## Quantity fallback chain
//!
//! Evaluated top to bottom, first present source wins. The order decides
//! which API shape takes precedence when a record carries several:
//!
//! | # | Source                                   |
//! |---|------------------------------------------|
//! | 1 | `available_quantity`                      |
//! | 2 | `stock`                                   |
//! | 3 | sum of `warehouses[].quantity` (missing = 0) |
//! | 4 | `0`                                       |

use imon_schemas::{clamp_quantity, parse_quantity, RemoteStockRecord};
use serde_json::Value;

use crate::api::RawRecord;

const CODE_FIELD: &str = "code";
const NAME_FIELD: &str = "name";
const AVAILABLE_FIELD: &str = "available_quantity";
const STOCK_FIELD: &str = "stock";
const WAREHOUSES_FIELD: &str = "warehouses";
const WAREHOUSE_QTY_FIELD: &str = "quantity";

type QuantitySource = fn(&serde_json::Map<String, Value>) -> Option<f64>;

const QUANTITY_CHAIN: [QuantitySource; 3] = [from_available, from_stock, from_warehouses];

fn from_available(m: &serde_json::Map<String, Value>) -> Option<f64> {
    present(m, AVAILABLE_FIELD).map(value_quantity)
}

fn from_stock(m: &serde_json::Map<String, Value>) -> Option<f64> {
    present(m, STOCK_FIELD).map(value_quantity)
}

fn from_warehouses(m: &serde_json::Map<String, Value>) -> Option<f64> {
    match present(m, WAREHOUSES_FIELD) {
        Some(Value::Array(entries)) => Some(
            entries
                .iter()
                .map(|e| e.get(WAREHOUSE_QTY_FIELD).map(value_quantity).unwrap_or(0.0))
                .sum(),
        ),
        _ => None,
    }
}

/// A field counts as present when the key exists and is not `null`.
fn present<'a>(m: &'a serde_json::Map<String, Value>, field: &str) -> Option<&'a Value> {
    m.get(field).filter(|v| !v.is_null())
}

fn value_quantity(v: &Value) -> f64 {
    match v {
        Value::Number(n) => clamp_quantity(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => parse_quantity(s),
        _ => 0.0,
    }
}

/// Scalar text of an identifying field; numbers are rendered, everything
/// else is empty.
fn text_field(m: &serde_json::Map<String, Value>, field: &str) -> String {
    match m.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Current stock of one raw record per the fallback chain.
pub fn current_quantity(record: &RawRecord) -> f64 {
    let Some(m) = record.as_object() else {
        return 0.0;
    };
    QUANTITY_CHAIN
        .iter()
        .find_map(|source| source(m))
        .map(clamp_quantity)
        .unwrap_or(0.0)
}

/// Normalize raw records, preserving remote order.
pub fn normalize_remote(records: &[RawRecord]) -> Vec<RemoteStockRecord> {
    records
        .iter()
        .filter_map(|r| {
            let m = r.as_object()?;
            let key = text_field(m, CODE_FIELD);
            let name = text_field(m, NAME_FIELD);
            if key.is_empty() || name.is_empty() {
                return None;
            }
            Some(RemoteStockRecord::new(key, name, current_quantity(r)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn available_quantity_beats_stock() {
        let r = json!({"code": "A", "name": "a", "available_quantity": 5, "stock": 999});
        assert_eq!(current_quantity(&r), 5.0);
    }

    #[test]
    fn stock_beats_warehouses() {
        let r = json!({"code": "A", "name": "a", "stock": 2, "warehouses": [{"quantity": 40}]});
        assert_eq!(current_quantity(&r), 2.0);
    }

    #[test]
    fn warehouses_are_summed_and_missing_quantity_is_zero() {
        let r = json!({"warehouses": [{"quantity": 3}, {"quantity": 4}, {"id": 9}]});
        assert_eq!(current_quantity(&r), 7.0);
    }

    #[test]
    fn no_source_means_zero() {
        assert_eq!(current_quantity(&json!({"code": "A"})), 0.0);
        assert_eq!(current_quantity(&json!({"warehouses": "n/a"})), 0.0);
        assert_eq!(current_quantity(&json!([1, 2])), 0.0);
    }

    #[test]
    fn null_field_is_not_present() {
        let r = json!({"available_quantity": null, "stock": 8});
        assert_eq!(current_quantity(&r), 8.0);
    }

    #[test]
    fn present_but_unparseable_field_still_wins() {
        // Presence, not parseability, decides precedence.
        let r = json!({"available_quantity": "n/a", "stock": 8});
        assert_eq!(current_quantity(&r), 0.0);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let r = json!({"available_quantity": "12.5"});
        assert_eq!(current_quantity(&r), 12.5);
    }

    #[test]
    fn records_without_code_or_name_are_dropped() {
        let raw = vec![
            json!({"code": "A", "name": " Sugar ", "stock": 1}),
            json!({"code": "", "name": "Nameless code"}),
            json!({"code": "C", "name": "   "}),
            json!({"name": "No code"}),
            json!("not an object"),
            json!({"code": 1234, "name": "Numeric code"}),
        ];
        let out = normalize_remote(&raw);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], RemoteStockRecord::new("A", "Sugar", 1.0));
        assert_eq!(out[1].key, "1234");
    }
}
