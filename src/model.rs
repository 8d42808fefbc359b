//! The model capability boundary.
//!
//! Concrete model types implement [`Model`]: they supply a
//! compile-time property table, an optional key-map override, support
//! zero-argument construction (`Default`), and transfer field values
//! through [`FieldValue`]. The [`model!`](crate::model!) macro
//! generates all of this from a struct declaration; hand-written
//! impls are equally valid (see the descriptor module tests).
//!
//! [`ModelField`] is implemented per field type and is what lets the
//! macro derive a property's declared [`Kind`] mechanically from its
//! Rust type, so the declared shape and the mapping logic cannot
//! drift apart.

use std::any::Any;
use std::fmt;

use crate::descriptor::{Kind, KeyMap, NestedModel, Primitive, PropertyDescriptor};

/// A typed value in transit between the engine and a model instance.
///
/// The engine guarantees the variant matches the property's declared
/// [`Kind`]; a model's `set` implementation may therefore ignore
/// non-matching variants.
pub enum FieldValue {
    /// A boolean leaf.
    Bool(bool),
    /// A signed integer leaf.
    I64(i64),
    /// An unsigned integer leaf.
    U64(u64),
    /// A float leaf.
    F64(f64),
    /// A string leaf.
    Str(String),
    /// A populated nested-model instance, type-erased.
    Model(Box<dyn Any + Send>),
    /// A populated collection, elements in original order.
    List(Vec<FieldValue>),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Model(_) => f.write_str("Model(..)"),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
        }
    }
}

/// A type that can be populated from a parsed JSON object.
///
/// `Default` provides the zero-argument construction the engine uses
/// to allocate an instance before field-by-field population; fields
/// that never receive a value keep their defaults.
pub trait Model: Default + Send + Sized + 'static {
    /// The model's name, used in diagnostics.
    fn model_name() -> &'static str;

    /// The JSON-key → property-name override map.
    ///
    /// Defaults to the empty map, i.e. pure identity: every property
    /// reads from the JSON key equal to its own name. A property
    /// named in the override does not fall back to identity.
    fn key_map() -> KeyMap {
        KeyMap::empty()
    }

    /// The declared property table, in declaration order.
    fn properties() -> Vec<PropertyDescriptor>;

    /// Assigns a mapped value to the named property.
    fn set(&mut self, property: &str, value: FieldValue);

    /// Reads the named property back out, for inverse mapping.
    ///
    /// Returns `None` for unknown property names and for unset
    /// optional fields (which the encoder omits).
    fn get(&self, property: &str) -> Option<FieldValue>;
}

/// A Rust type usable as a model field.
///
/// Implemented for the primitive leaves (`bool`, `i64`, `u64`, `f64`,
/// `String`), for `Option<T>` and `Vec<T>` of such types, and by the
/// [`model!`](crate::model!) macro for every declared model type.
pub trait ModelField: Sized + Send + 'static {
    /// The declared kind this Rust type maps from.
    fn kind() -> Kind;

    /// Converts a transfer value into this type.
    ///
    /// Returns `None` when the variant does not match; under the
    /// engine's contract this does not happen for values it produced.
    fn from_field(value: FieldValue) -> Option<Self>;

    /// Converts this value back into a transfer value, or `None` for
    /// an unset optional field.
    fn to_field(&self) -> Option<FieldValue>;
}

impl ModelField for bool {
    fn kind() -> Kind {
        Kind::Primitive(Primitive::Bool)
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::Bool(*self))
    }
}

impl ModelField for i64 {
    fn kind() -> Kind {
        Kind::Primitive(Primitive::I64)
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::I64(v) => Some(v),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::I64(*self))
    }
}

impl ModelField for u64 {
    fn kind() -> Kind {
        Kind::Primitive(Primitive::U64)
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::U64(v) => Some(v),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::U64(*self))
    }
}

impl ModelField for f64 {
    fn kind() -> Kind {
        Kind::Primitive(Primitive::F64)
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::F64(v) => Some(v),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::F64(*self))
    }
}

impl ModelField for String {
    fn kind() -> Kind {
        Kind::Primitive(Primitive::Str)
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::Str(self.clone()))
    }
}

impl<T: ModelField> ModelField for Option<T> {
    fn kind() -> Kind {
        T::kind()
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        T::from_field(value).map(Some)
    }

    fn to_field(&self) -> Option<FieldValue> {
        self.as_ref().and_then(ModelField::to_field)
    }
}

impl<T: ModelField> ModelField for Vec<T> {
    fn kind() -> Kind {
        Kind::List(T::kind().into_element())
    }

    fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::List(items) => items.into_iter().map(T::from_field).collect(),
            _ => None,
        }
    }

    fn to_field(&self) -> Option<FieldValue> {
        Some(FieldValue::List(
            self.iter().filter_map(ModelField::to_field).collect(),
        ))
    }
}

/// Registers a nested-model field type. Used by the
/// [`model!`](crate::model!) macro; hand-written [`Model`] impls that
/// appear as fields of other models need the same three methods.
#[must_use]
pub fn nested_kind<M: Model>() -> Kind {
    Kind::Model(NestedModel::of::<M>())
}
