use serde_json::{Map, Value};

use crate::error::{json_kind, ImdbError, Result};
use crate::model::{
    ElementType, Entity, EntityDescriptor, FieldDef, FieldType, FieldValue, Primitive,
    SchemaRegistry,
};

/// Validates raw JSON against entity descriptors and builds typed entities.
///
/// Nested reference fields are built recursively through the registry. The
/// first error found aborts the whole construction and is returned as-is,
/// so a failure deep in a credit's avatar list names that avatar field.
pub struct Constructor<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Constructor<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Build an entity of the named kind from a raw JSON object
    pub fn construct_kind(&self, kind: &str, raw: &Value) -> Result<Entity> {
        let descriptor = self.registry.descriptor(kind)?;
        self.construct(descriptor, raw, false)
    }

    /// Build an entity from a raw JSON object.
    ///
    /// With `ignore_required` set, absent required fields are tolerated.
    pub fn construct(
        &self,
        descriptor: &EntityDescriptor,
        raw: &Value,
        ignore_required: bool,
    ) -> Result<Entity> {
        let fields = raw.as_object().ok_or_else(|| {
            ImdbError::InvalidArgumentType(format!(
                "{} must be constructed from an object, {} given",
                descriptor.name,
                json_kind(raw)
            ))
        })?;
        self.construct_fields(descriptor, fields, ignore_required)
    }

    /// Validate and replace a single field of an existing entity.
    ///
    /// Only `field` is checked; required-ness is not enforced and no other
    /// field is touched. A null value unsets the field.
    pub fn patch(&self, entity: &mut Entity, field: &str, value: &Value) -> Result<()> {
        let descriptor = self.registry.descriptor(entity.kind())?;
        let field_def = descriptor
            .field(field)
            .ok_or_else(|| unknown_field(descriptor, field))?;

        if value.is_null() {
            entity.remove(field);
            return Ok(());
        }

        let converted = self.convert(descriptor, field_def, value)?;
        entity.set(field, converted, |name| {
            descriptor.position(name).unwrap_or(usize::MAX)
        });
        Ok(())
    }

    fn construct_fields(
        &self,
        descriptor: &EntityDescriptor,
        raw: &Map<String, Value>,
        ignore_required: bool,
    ) -> Result<Entity> {
        if let Some(unknown) = raw.keys().find(|key| descriptor.field(key).is_none()) {
            return Err(unknown_field(descriptor, unknown));
        }

        let mut entity = Entity::new(&descriptor.name);
        for field in &descriptor.fields {
            match raw.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required && !ignore_required {
                        return Err(ImdbError::MissingRequiredField {
                            kind: descriptor.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }
                Some(value) => {
                    let converted = self.convert(descriptor, field, value)?;
                    entity.push(&field.name, converted);
                }
            }
        }

        Ok(entity)
    }

    fn convert(
        &self,
        owner: &EntityDescriptor,
        field: &FieldDef,
        value: &Value,
    ) -> Result<FieldValue> {
        match &field.field_type {
            FieldType::Scalar(primitive) => scalar(owner, field, *primitive, value),
            FieldType::Entity(kind) => self.nested(owner, field, kind, value),
            FieldType::List(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch(owner, field, json_kind(value).to_string()))?;
                items
                    .iter()
                    .map(|item| match element {
                        ElementType::Scalar(primitive) => scalar(owner, field, *primitive, item),
                        ElementType::Entity(kind) => self.nested(owner, field, kind, item),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(FieldValue::List)
            }
        }
    }

    fn nested(
        &self,
        owner: &EntityDescriptor,
        field: &FieldDef,
        kind: &str,
        value: &Value,
    ) -> Result<FieldValue> {
        let descriptor = self.registry.descriptor(kind)?;
        let fields = value
            .as_object()
            .ok_or_else(|| mismatch(owner, field, json_kind(value).to_string()))?;
        self.construct_fields(descriptor, fields, false)
            .map(FieldValue::Entity)
    }
}

fn scalar(
    owner: &EntityDescriptor,
    field: &FieldDef,
    primitive: Primitive,
    value: &Value,
) -> Result<FieldValue> {
    if !primitive.matches(value) {
        let found = match field.field_type {
            FieldType::List(_) => format!("a {} element", json_kind(value)),
            _ => json_kind(value).to_string(),
        };
        return Err(mismatch(owner, field, found));
    }

    let converted = match (primitive, value) {
        (Primitive::String, Value::String(s)) => FieldValue::String(s.clone()),
        (Primitive::Boolean, Value::Bool(b)) => FieldValue::Boolean(*b),
        (Primitive::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer).ok_or_else(
            || mismatch(owner, field, json_kind(value).to_string()),
        )?,
        (Primitive::Float, Value::Number(n)) => n.as_f64().map(FieldValue::Float).ok_or_else(
            || mismatch(owner, field, json_kind(value).to_string()),
        )?,
        _ => return Err(mismatch(owner, field, json_kind(value).to_string())),
    };
    Ok(converted)
}

fn mismatch(owner: &EntityDescriptor, field: &FieldDef, found: String) -> ImdbError {
    ImdbError::FieldTypeMismatch {
        kind: owner.name.clone(),
        field: field.name.clone(),
        expected: field.field_type.to_string(),
        found,
    }
}

fn unknown_field(descriptor: &EntityDescriptor, field: &str) -> ImdbError {
    ImdbError::UnknownField {
        kind: descriptor.name.clone(),
        field: field.to_string(),
    }
}
