use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar kinds a field (or list element) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Float,
    Boolean,
}

impl Primitive {
    /// Exact kind match, no numeric coercion: an integral JSON number is
    /// not a float and a float is not an integer.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Primitive::String, Value::String(_)) => true,
            (Primitive::Boolean, Value::Bool(_)) => true,
            (Primitive::Integer, Value::Number(n)) => n.is_i64(),
            (Primitive::Float, Value::Number(n)) => n.is_f64(),
            _ => false,
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Primitive::String => write!(f, "string"),
            Primitive::Integer => write!(f, "integer"),
            Primitive::Float => write!(f, "float"),
            Primitive::Boolean => write!(f, "boolean"),
        }
    }
}

/// Element type of a list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Scalar(Primitive),
    /// Reference to another descriptor by kind name
    Entity(String),
}

/// Declared type of a single descriptor field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Scalar(Primitive),
    /// Reference to another descriptor by kind name, resolved through the
    /// registry so descriptors may point forward or at each other.
    Entity(String),
    List(ElementType),
}

impl FieldType {
    pub fn entity(kind: &str) -> Self {
        FieldType::Entity(kind.to_string())
    }

    pub fn list_of(primitive: Primitive) -> Self {
        FieldType::List(ElementType::Scalar(primitive))
    }

    pub fn list_of_entity(kind: &str) -> Self {
        FieldType::List(ElementType::Entity(kind.to_string()))
    }

    /// Kind name this field points at, for reference and list-of-reference
    /// fields.
    pub fn referenced_kind(&self) -> Option<&str> {
        match self {
            FieldType::Entity(kind) | FieldType::List(ElementType::Entity(kind)) => Some(kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FieldType::Scalar(p) => write!(f, "{}", p),
            FieldType::Entity(kind) => write!(f, "{} object", kind),
            FieldType::List(ElementType::Scalar(p)) => write!(f, "list of {}", p),
            FieldType::List(ElementType::Entity(kind)) => write!(f, "list of {}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_exact_matching() {
        assert!(Primitive::String.matches(&json!("movie")));
        assert!(Primitive::Integer.matches(&json!(2007)));
        assert!(Primitive::Float.matches(&json!(4.2)));
        assert!(Primitive::Boolean.matches(&json!(false)));

        // No coercion between numeric kinds
        assert!(!Primitive::Float.matches(&json!(4)));
        assert!(!Primitive::Integer.matches(&json!(4.5)));
        assert!(!Primitive::Integer.matches(&json!(true)));
        assert!(!Primitive::String.matches(&json!(null)));
    }

    #[test]
    fn test_referenced_kind() {
        assert_eq!(FieldType::entity("Rating").referenced_kind(), Some("Rating"));
        assert_eq!(
            FieldType::list_of_entity("Credit").referenced_kind(),
            Some("Credit")
        );
        assert_eq!(FieldType::list_of(Primitive::String).referenced_kind(), None);
    }

    #[test]
    fn test_field_type_serde_shape() {
        let field_type = FieldType::list_of_entity("Poster");
        let json = serde_json::to_value(&field_type).unwrap();
        assert_eq!(json, json!({"list": {"entity": "Poster"}}));

        let parsed: FieldType = serde_json::from_value(json!({"scalar": "float"})).unwrap();
        assert_eq!(parsed, FieldType::Scalar(Primitive::Float));
    }
}
