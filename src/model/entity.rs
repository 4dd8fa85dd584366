use serde_json::{Number, Value};

/// Value held by one field of a typed entity.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Entity(Entity),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            FieldValue::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain JSON form of this value
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::Number((*n).into()),
            // Floats only ever come from parsed JSON, so they are finite
            FieldValue::Float(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Entity(entity) => Value::Object(entity.to_json()),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
        }
    }
}

/// Instance of an entity descriptor.
///
/// Holds only the fields that were supplied, in declared field order.
/// Built and patched through `logic::Constructor`, which owns validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: String,
    fields: Vec<(String, FieldValue)>,
}

impl Entity {
    pub(crate) fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            fields: Vec::new(),
        }
    }

    /// Kind name of the descriptor this entity was built from
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Read a field; unknown or unset names give `None`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Plain JSON mapping of the set fields
    pub fn to_json(&self) -> serde_json::Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    pub(crate) fn push(&mut self, name: &str, value: FieldValue) {
        self.fields.push((name.to_string(), value));
    }

    /// Replace a field in place, or insert it before the first field whose
    /// declared position comes after it.
    pub(crate) fn set(&mut self, name: &str, value: FieldValue, order: impl Fn(&str) -> usize) {
        if let Some(slot) = self.fields.iter_mut().find(|(field, _)| field == name) {
            slot.1 = value;
            return;
        }
        let rank = order(name);
        let index = self
            .fields
            .iter()
            .position(|(field, _)| order(field) > rank)
            .unwrap_or(self.fields.len());
        self.fields.insert(index, (name.to_string(), value));
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(index).1)
    }
}
