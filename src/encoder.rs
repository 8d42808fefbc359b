//! Inverse mapping: model instances back to JSON values.
//!
//! [`Mapper::encode`] walks the same resolved descriptor the mapping
//! path uses, reads each property via [`Model::get`], and writes it
//! under the property's resolved JSON key (the inverse of the key
//! map). Unset optional fields are omitted; nested models and
//! collections recurse. Every field successfully mapped on a first
//! pass re-maps identically from the encoded value.

use std::any::Any;

use serde_json::Value;

use crate::descriptor::{Elem, Kind};
use crate::mapper::Mapper;
use crate::model::{FieldValue, Model};

impl Mapper {
    /// Encodes a model instance into a JSON object value, applying
    /// the inverse of the model's key map.
    #[must_use]
    pub fn encode<M: Model>(&self, instance: &M) -> Value {
        let descriptor = self.descriptor::<M>();
        let mut object = serde_json::Map::with_capacity(descriptor.properties().len());
        for resolved in descriptor.properties() {
            if let Some(field) = instance.get(resolved.property.name) {
                object.insert(
                    resolved.json_key.clone(),
                    self.field_to_json(&resolved.property.kind, &field),
                );
            }
        }
        Value::Object(object)
    }

    fn field_to_json(&self, kind: &Kind, field: &FieldValue) -> Value {
        match (kind, field) {
            (Kind::Model(nested), FieldValue::Model(erased)) => {
                (nested.encode_value)(self, erased.as_ref())
            }
            (Kind::List(element), FieldValue::List(items)) => Value::Array(
                items
                    .iter()
                    .map(|item| self.element_to_json(element, item))
                    .collect(),
            ),
            (Kind::Primitive(_) | Kind::Model(_) | Kind::List(_), leaf) => leaf_to_json(leaf),
        }
    }

    fn element_to_json(&self, element: &Elem, field: &FieldValue) -> Value {
        match (element, field) {
            (Elem::Model(nested), FieldValue::Model(erased)) => {
                (nested.encode_value)(self, erased.as_ref())
            }
            (Elem::Primitive(_) | Elem::Model(_), leaf) => leaf_to_json(leaf),
        }
    }
}

fn leaf_to_json(field: &FieldValue) -> Value {
    match field {
        FieldValue::Bool(v) => Value::Bool(*v),
        FieldValue::I64(v) => Value::Number((*v).into()),
        FieldValue::U64(v) => Value::Number((*v).into()),
        FieldValue::F64(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        FieldValue::Str(v) => Value::String(v.clone()),
        // Kind/value disagreement does not happen for engine-produced
        // values; encode defensively as null.
        FieldValue::Model(_) | FieldValue::List(_) => Value::Null,
    }
}

/// Type-erased encode entry point for `M`, stored in
/// [`NestedModel`](crate::descriptor::NestedModel).
pub(crate) fn encode_erased<M: Model>(mapper: &Mapper, erased: &(dyn Any + Send)) -> Value {
    erased
        .downcast_ref::<M>()
        .map_or(Value::Null, |instance| mapper.encode(instance))
}
