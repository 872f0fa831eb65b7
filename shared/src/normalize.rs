//! Normalization of raw stored documents.
//!
//! Documents written by older clients can miss fields or carry the wrong
//! JSON type. These helpers turn raw values into typed entities, defaulting
//! anything malformed instead of erroring: availability over strictness.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::Variation;
use crate::util::now_millis;

/// `is_active` on products: absent or non-boolean means active.
pub fn is_active(doc: &Value) -> bool {
    match doc.get("is_active") {
        Some(Value::Bool(b)) => *b,
        _ => true,
    }
}

/// Tag list: anything but an array of strings collapses to empty.
pub fn tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

fn decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

/// Variations array of a raw product document.
///
/// A missing or non-numeric variation id is backfilled with
/// `now_millis() + index`, matching what legacy documents were given when
/// first repaired. Freshly inserted variations never take this path; they
/// get snowflake ids up front.
pub fn variations(doc: &Value) -> Vec<Variation> {
    let Some(Value::Array(raw)) = doc.get("variations") else {
        return Vec::new();
    };
    let fallback_base = now_millis();
    raw.iter()
        .enumerate()
        .map(|(index, item)| Variation {
            id: item
                .get("id")
                .and_then(Value::as_i64)
                .unwrap_or(fallback_base + index as i64),
            name: item
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            price: decimal(item.get("price")),
            tags: tags(item.get("tags")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_is_active_defaults_to_true() {
        assert!(is_active(&json!({ "name": "Paella" })));
        assert!(is_active(&json!({ "is_active": "yes" })));
        assert!(!is_active(&json!({ "is_active": false })));
    }

    #[test]
    fn malformed_tags_collapse_to_empty() {
        assert!(tags(Some(&json!("vegan"))).is_empty());
        assert!(tags(None).is_empty());
        assert_eq!(tags(Some(&json!(["vegan", 3, "sin gluten"]))), vec![
            "vegan".to_string(),
            "sin gluten".to_string()
        ]);
    }

    #[test]
    fn variation_without_id_gets_time_based_fallback() {
        let doc = json!({
            "variations": [
                { "name": "Media", "price": 7.5 },
                { "id": 42, "name": "Entera", "price": "14.00", "tags": ["popular"] },
            ]
        });
        let before = now_millis();
        let parsed = variations(&doc);
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].id >= before);
        assert_eq!(parsed[1].id, 42);
        assert_eq!(parsed[1].tags, vec!["popular".to_string()]);
        assert_eq!(parsed[1].price, Decimal::from(14));
    }

    #[test]
    fn missing_variations_field_is_empty() {
        assert!(variations(&json!({ "name": "Café" })).is_empty());
    }
}
