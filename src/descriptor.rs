//! Model descriptors: the declared shape the engine maps against.
//!
//! Each model type registers a compile-time property-descriptor table
//! (see [`Model::properties`](crate::model::Model::properties)) and an
//! optional [`KeyMap`] override. [`ModelDescriptor::of`] resolves the
//! two into the per-type view the mapper engine walks: one JSON key
//! per property, in declaration order. Resolution inspects no JSON and
//! is pure data, so the engine caches the result per type.

use std::any::Any;
use std::fmt;

use serde_json::Value;

use crate::error::MapIssue;
use crate::model::Model;
use crate::path::Path;

/// A primitive target type for a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `bool`
    Bool,
    /// `i64`
    I64,
    /// `u64`
    U64,
    /// `f64`
    F64,
    /// `String`
    Str,
}

impl Primitive {
    /// Human-readable type name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::I64 => "integer",
            Self::U64 => "unsigned integer",
            Self::F64 => "float",
            Self::Str => "string",
        }
    }
}

pub(crate) type MapFn =
    fn(&crate::mapper::Mapper, &serde_json::Map<String, Value>, &Path, &mut Vec<MapIssue>) -> Box<dyn Any + Send>;

pub(crate) type EncodeFn = fn(&crate::mapper::Mapper, &(dyn Any + Send)) -> Value;

/// A type-erased handle to a nested model type.
///
/// Carries the monomorphized map/encode entry points for the concrete
/// type, so the engine can recurse without reflection: the descriptor
/// table is the static, type-safe description of the model graph.
#[derive(Clone, Copy)]
pub struct NestedModel {
    model_name: &'static str,
    pub(crate) map_value: MapFn,
    pub(crate) encode_value: EncodeFn,
}

impl NestedModel {
    /// Creates the handle for a concrete model type.
    #[must_use]
    pub fn of<M: Model>() -> Self {
        Self {
            model_name: M::model_name(),
            map_value: crate::mapper::map_erased::<M>,
            encode_value: crate::encoder::encode_erased::<M>,
        }
    }

    /// Name of the nested model type.
    #[must_use]
    pub fn model_name(&self) -> &'static str {
        self.model_name
    }
}

impl fmt::Debug for NestedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedModel")
            .field("model", &self.model_name)
            .finish()
    }
}

/// The declared kind of a property.
#[derive(Debug, Clone)]
pub enum Kind {
    /// A primitive leaf.
    Primitive(Primitive),
    /// A nested model (JSON object).
    Model(NestedModel),
    /// A collection of primitives or models (JSON array).
    List(Elem),
}

impl Kind {
    /// The expected JSON kind name for diagnostics.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::Model(_) => "object",
            Self::List(_) => "array",
        }
    }

    /// Converts this kind into a collection element kind.
    ///
    /// # Panics
    ///
    /// Panics for [`Kind::List`]: collections of collections are not
    /// supported as element types.
    #[must_use]
    pub fn into_element(self) -> Elem {
        match self {
            Self::Primitive(p) => Elem::Primitive(p),
            Self::Model(n) => Elem::Model(n),
            Self::List(_) => panic!("collections of collections are not supported"),
        }
    }
}

/// The declared kind of a collection element.
#[derive(Debug, Clone)]
pub enum Elem {
    /// A primitive element.
    Primitive(Primitive),
    /// A nested-model element.
    Model(NestedModel),
}

impl Elem {
    /// The expected JSON kind name for diagnostics.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::Model(_) => "object",
        }
    }
}

/// One entry in a model's declared property table.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// Property name (the native field name).
    pub name: &'static str,
    /// Declared target kind.
    pub kind: Kind,
    /// Whether an absent or `null` value is a
    /// [`MissingField`](crate::error::IssueKind::MissingField) finding
    /// rather than a default.
    pub required: bool,
    /// For collections: whether any element failure fails the whole
    /// field instead of keeping the surviving elements.
    pub strict: bool,
}

impl PropertyDescriptor {
    /// Creates an optional, non-strict property.
    #[must_use]
    pub fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            strict: false,
        }
    }

    /// Marks the property required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks a collection property strict.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// An immutable JSON-key → property-name override map.
///
/// JSON keys are unique within one map; a duplicate key in
/// [`from_pairs`](Self::from_pairs) keeps the first entry. A property
/// named anywhere in the map does not fall back to the identity key:
/// the override, when present for a property, is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    entries: Vec<(String, String)>,
}

impl KeyMap {
    /// The empty map: every property maps to itself as the JSON key.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a map from `(json_key, property_name)` pairs.
    #[must_use]
    pub fn from_pairs<const N: usize>(pairs: [(&str, &str); N]) -> Self {
        let mut map = Self::default();
        for (json_key, property) in pairs {
            if map.property_for(json_key).is_none() {
                map.entries
                    .push((json_key.to_string(), property.to_string()));
            }
        }
        map
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Looks up the property name for a JSON key.
    #[must_use]
    pub fn property_for(&self, json_key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == json_key)
            .map(|(_, p)| p.as_str())
    }

    /// Looks up the JSON key mapped to a property, in declaration
    /// order (first entry wins).
    #[must_use]
    pub fn json_key_for(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| p == property)
            .map(|(k, _)| k.as_str())
    }
}

/// A property with its JSON key resolved against the model's key map.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    /// The declared property.
    pub property: PropertyDescriptor,
    /// The JSON key this property reads from and writes to.
    pub json_key: String,
}

/// The resolved, cacheable per-type view the mapper engine walks.
#[derive(Debug)]
pub struct ModelDescriptor {
    name: &'static str,
    properties: Vec<ResolvedProperty>,
}

impl ModelDescriptor {
    /// Resolves the descriptor for a model type: key-map override
    /// first, identity fallback for properties the override does not
    /// name.
    #[must_use]
    pub fn of<M: Model>() -> Self {
        let key_map = M::key_map();
        let properties = M::properties()
            .into_iter()
            .map(|property| {
                let json_key = key_map
                    .json_key_for(property.name)
                    .unwrap_or(property.name)
                    .to_string();
                ResolvedProperty { property, json_key }
            })
            .collect();
        Self {
            name: M::model_name(),
            properties,
        }
    }

    /// The model type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The resolved properties, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[ResolvedProperty] {
        &self.properties
    }

    /// Returns `true` if some property reads from the given JSON key.
    /// Linear scan: typical models have well under 50 properties.
    #[must_use]
    pub fn has_json_key(&self, key: &str) -> bool {
        self.properties.iter().any(|p| p.json_key == key)
    }
}
