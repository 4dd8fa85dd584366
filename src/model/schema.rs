use crate::error::{ImdbError, Result};
use crate::model::FieldType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a descriptor's field table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    /// Must be present when an entity is constructed from scratch
    #[serde(default)]
    pub required: bool,
    /// Selected when this kind is queried from inside another entity
    #[serde(default)]
    pub main_attribute: bool,
}

impl FieldDef {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: false,
            main_attribute: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn main(mut self) -> Self {
        self.main_attribute = true;
        self
    }
}

/// Schema definition for one entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    /// Ordered field table; order drives query and flattened output order
    pub fields: Vec<FieldDef>,
}

impl EntityDescriptor {
    pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    /// Find a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Position of a field in the declared order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// Immutable set of entity descriptors keyed by kind name.
///
/// Built once at start-up and passed explicitly to the constructor and the
/// query builder. Every entity reference inside it is known to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    descriptors: BTreeMap<String, EntityDescriptor>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a registry from plain descriptor data (e.g. a JSON document).
    pub fn from_descriptors(descriptors: Vec<EntityDescriptor>) -> Result<Self> {
        descriptors
            .into_iter()
            .fold(Self::builder(), SchemaBuilder::declare)
            .build()
    }

    /// Look up a descriptor by kind name
    pub fn descriptor(&self, kind: &str) -> Result<&EntityDescriptor> {
        self.descriptors
            .get(kind)
            .ok_or_else(|| ImdbError::UnknownEntityKind(kind.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.descriptors.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Walk every kind's default selection (main attributes only) and
    /// confirm it bottoms out within `len()` levels. Returns the deepest
    /// nesting seen.
    pub fn verify_default_selection(&self) -> Result<usize> {
        let mut deepest = 0;
        for kind in self.descriptors.keys() {
            deepest = deepest.max(self.default_depth(kind, kind, 0)?);
        }
        Ok(deepest)
    }

    fn default_depth(&self, origin: &str, kind: &str, depth: usize) -> Result<usize> {
        if depth > self.descriptors.len() {
            return Err(ImdbError::MainAttributeCycle(origin.to_string()));
        }
        let descriptor = self.descriptor(kind)?;
        let mut deepest = depth;
        for field in descriptor.fields.iter().filter(|f| f.main_attribute) {
            if let Some(nested) = field.field_type.referenced_kind() {
                deepest = deepest.max(self.default_depth(origin, nested, depth + 1)?);
            }
        }
        Ok(deepest)
    }
}

/// Two-pass registry construction: declare every descriptor first, then
/// `build` resolves all references at once so declaration order never
/// matters.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    descriptors: BTreeMap<String, EntityDescriptor>,
}

impl SchemaBuilder {
    pub fn declare(mut self, descriptor: EntityDescriptor) -> Self {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn build(self) -> Result<SchemaRegistry> {
        for descriptor in self.descriptors.values() {
            for field in &descriptor.fields {
                if let Some(kind) = field.field_type.referenced_kind() {
                    if !self.descriptors.contains_key(kind) {
                        return Err(ImdbError::UnknownEntityKind(kind.to_string()));
                    }
                }
            }
        }

        let registry = SchemaRegistry {
            descriptors: self.descriptors,
        };

        if cfg!(debug_assertions) {
            registry.verify_default_selection()?;
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Primitive;

    fn node(name: &str, next: &str, main: bool) -> EntityDescriptor {
        let mut link = FieldDef::new("next", FieldType::entity(next));
        link.main_attribute = main;
        EntityDescriptor::new(
            name,
            vec![
                FieldDef::new("label", FieldType::Scalar(Primitive::String)).main(),
                link,
            ],
        )
    }

    #[test]
    fn test_forward_references_resolve_regardless_of_order() {
        let registry = SchemaRegistry::builder()
            .declare(node("A", "B", true))
            .declare(node("B", "A", false))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.descriptor("A").is_ok());
        assert_eq!(registry.verify_default_selection().unwrap(), 1);
    }

    #[test]
    fn test_unresolved_reference_is_configuration_error() {
        let result = SchemaRegistry::builder()
            .declare(node("A", "Missing", true))
            .build();

        match result {
            Err(ImdbError::UnknownEntityKind(kind)) => assert_eq!(kind, "Missing"),
            other => panic!("expected UnknownEntityKind, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_lookup() {
        let registry = SchemaRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.descriptor("Title"),
            Err(ImdbError::UnknownEntityKind(_))
        ));
    }

    #[test]
    fn test_main_attribute_cycle_detected() {
        let registry = SchemaRegistry {
            descriptors: [node("A", "B", true), node("B", "A", true)]
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        };

        assert!(matches!(
            registry.verify_default_selection(),
            Err(ImdbError::MainAttributeCycle(_))
        ));
    }

    #[test]
    fn test_registry_from_json_descriptors() {
        let descriptors: Vec<EntityDescriptor> = serde_json::from_value(serde_json::json!([
            {
                "name": "Rating",
                "fields": [
                    {"name": "aggregate_rating", "field_type": {"scalar": "float"}, "main_attribute": true},
                    {"name": "votes_count", "field_type": {"scalar": "integer"}, "main_attribute": true}
                ]
            }
        ]))
        .unwrap();

        let registry = SchemaRegistry::from_descriptors(descriptors).unwrap();
        let rating = registry.descriptor("Rating").unwrap();
        assert_eq!(rating.position("votes_count"), Some(1));
        assert!(!rating.field("aggregate_rating").unwrap().required);
    }
}
