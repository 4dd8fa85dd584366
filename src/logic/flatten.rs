use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{json_kind, ImdbError, Result};
use crate::model::{Entity, FieldValue};

/// Plain, backend-agnostic JSON mapping handed back to callers
pub type Record = Map<String, Value>;

/// Conversion of typed entity graphs, or plain containers holding them,
/// into ordinary JSON.
pub trait Flatten {
    fn flatten(&self) -> Value;
}

impl Flatten for Entity {
    fn flatten(&self) -> Value {
        Value::Object(self.to_json())
    }
}

impl Flatten for FieldValue {
    fn flatten(&self) -> Value {
        self.to_json()
    }
}

impl Flatten for Value {
    fn flatten(&self) -> Value {
        match self {
            Value::Object(map) => map.flatten(),
            Value::Array(items) => items.as_slice().flatten(),
            other => other.clone(),
        }
    }
}

impl Flatten for Map<String, Value> {
    fn flatten(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.flatten()))
                .collect(),
        )
    }
}

impl<T: Flatten> Flatten for BTreeMap<String, T> {
    fn flatten(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.flatten()))
                .collect(),
        )
    }
}

impl<T: Flatten> Flatten for [T] {
    fn flatten(&self) -> Value {
        Value::Array(self.iter().map(Flatten::flatten).collect())
    }
}

impl<T: Flatten> Flatten for Vec<T> {
    fn flatten(&self) -> Value {
        self.as_slice().flatten()
    }
}

impl<T: Flatten + ?Sized> Flatten for &T {
    fn flatten(&self) -> Value {
        (**self).flatten()
    }
}

pub fn flatten<T: Flatten + ?Sized>(value: &T) -> Value {
    value.flatten()
}

/// Flatten something that must come out as a mapping
pub fn flatten_record<T: Flatten + ?Sized>(value: &T) -> Result<Record> {
    match value.flatten() {
        Value::Object(map) => Ok(map),
        other => Err(ImdbError::InvalidArgumentType(format!(
            "flatten must produce a mapping, {} given",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Constructor;
    use crate::model::{build_registry, catalog};
    use serde_json::json;

    #[test]
    fn test_end_to_end_rating_example() {
        let raw = json!({
            "id": "tt0477051",
            "type": "movie",
            "rating": {"aggregate_rating": 4.2, "votes_count": 79169}
        });
        let registry = build_registry().unwrap();
        let title = Constructor::new(&registry)
            .construct_kind(catalog::TITLE, &raw)
            .unwrap();

        assert_eq!(flatten(&title), raw);
    }

    #[test]
    fn test_unset_fields_are_absent_not_null() {
        let registry = build_registry().unwrap();
        let title = Constructor::new(&registry)
            .construct_kind(
                catalog::TITLE,
                &json!({"id": "tt0477051", "plot": null, "genres": ["Comedy"]}),
            )
            .unwrap();

        let record = flatten_record(&title).unwrap();
        assert_eq!(record.len(), 2);
        assert!(!record.contains_key("plot"));
    }

    #[test]
    fn test_mixed_mapping_with_entities() {
        let registry = build_registry().unwrap();
        let constructor = Constructor::new(&registry);
        let rating = constructor
            .construct_kind(catalog::RATING, &json!({"votes_count": 10}))
            .unwrap();

        let mut mixed: BTreeMap<String, Vec<FieldValue>> = BTreeMap::new();
        mixed.insert(
            "ratings".to_string(),
            vec![FieldValue::Entity(rating), FieldValue::Integer(3)],
        );

        assert_eq!(flatten(&mixed), json!({"ratings": [{"votes_count": 10}, 3]}));
    }

    #[test]
    fn test_flatten_is_idempotent_on_plain_data() {
        let inputs = [
            json!({"b": 1, "a": [1, {"z": null, "y": "s"}], "c": {"d": [true, 2.5]}}),
            json!([1, "two", [3]]),
            json!("plain"),
            json!(null),
        ];
        for input in inputs {
            let once = flatten(&input);
            assert_eq!(flatten(&once), once);
            assert_eq!(once, input);
        }
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let input: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<String> = flatten_record(&input).unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_flatten_record_rejects_non_mappings() {
        assert!(matches!(
            flatten_record(&json!([1, 2])),
            Err(ImdbError::InvalidArgumentType(_))
        ));
        assert!(matches!(
            flatten_record(&json!("tt0477051")),
            Err(ImdbError::InvalidArgumentType(_))
        ));
    }
}
