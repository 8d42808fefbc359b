//! The mapper engine.
//!
//! [`Mapper::map`] populates a model instance from a parsed JSON
//! object: it resolves the model's descriptor (cached per type),
//! allocates a default instance, then walks the declared properties in
//! order, coercing leaves, recursing into nested models, and mapping
//! collections element by element. Field-level findings accumulate;
//! they never abort sibling fields, so one malformed field never
//! prevents mapping the rest of a payload. Only a non-object root
//! short-circuits.
//!
//! Each `map` call is a pure function of its arguments; the only
//! shared state is the synchronized descriptor cache, so a `Mapper`
//! can serve any number of threads concurrently.

use std::any::{Any, TypeId};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::descriptor::{Elem, Kind, ModelDescriptor, Primitive};
use crate::error::{JsonKind, MapFailure, MapIssue, MapResult};
use crate::model::{FieldValue, Model};
use crate::path::Path;

/// Strategy for JSON keys that match no declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Silently ignore unknown keys (default, forward-compatible).
    #[default]
    Ignore,
    /// Record an unknown-key issue for each one.
    Reject,
}

/// Mapper configuration.
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    /// How to handle JSON keys not claimed by any property.
    pub unknown_keys: UnknownKeys,
}

/// Maps parsed JSON values into model instances.
///
/// Owns the per-type descriptor cache: key maps and property tables
/// are resolved once per model type and reused for the mapper's
/// lifetime (types do not change shape at runtime).
pub struct Mapper {
    config: MapperConfig,
    descriptors: RwLock<FxHashMap<TypeId, Arc<ModelDescriptor>>>,
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("config", &self.config)
            .field("cached_descriptors", &self.descriptors.read().len())
            .finish()
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapper {
    /// Creates a mapper with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    /// Creates a mapper with custom configuration.
    #[must_use]
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            descriptors: RwLock::new(FxHashMap::default()),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Number of model types with a resolved descriptor.
    #[must_use]
    pub fn cached_descriptors(&self) -> usize {
        self.descriptors.read().len()
    }

    /// Maps a parsed JSON value into a populated `M`.
    ///
    /// # Errors
    ///
    /// Returns [`MapFailure`] when any issue accumulated. The failure
    /// still carries the best-effort populated instance; callers
    /// inspect the issue list (or
    /// [`only_warnings`](MapFailure::only_warnings)) to decide whether
    /// the partial result is acceptable. A non-object root yields a
    /// single root shape mismatch and a fully-default instance.
    pub fn map<M: Model>(&self, value: &Value) -> MapResult<M> {
        let mut issues = Vec::new();
        let instance = match value.as_object() {
            Some(object) => self.map_object::<M>(object, &Path::root(), &mut issues),
            None => {
                issues.push(MapIssue::shape_mismatch(
                    Path::root(),
                    "object",
                    JsonKind::of(value),
                ));
                M::default()
            }
        };
        if issues.is_empty() {
            Ok(instance)
        } else {
            debug!(
                model = M::model_name(),
                issues = issues.len(),
                "mapping completed with issues"
            );
            Err(MapFailure {
                model: M::model_name(),
                instance,
                issues,
            })
        }
    }

    /// Maps one JSON object against `M`'s descriptor, accumulating
    /// issues into `issues` with paths relative to `path`.
    pub(crate) fn map_object<M: Model>(
        &self,
        object: &serde_json::Map<String, Value>,
        path: &Path,
        issues: &mut Vec<MapIssue>,
    ) -> M {
        let descriptor = self.descriptor::<M>();
        let mut instance = M::default();

        for resolved in descriptor.properties() {
            let property = &resolved.property;
            let field_path = path.child(property.name);
            match object.get(&resolved.json_key) {
                // Absent and null are the same: default for optional
                // properties, a finding for required ones.
                None | Some(Value::Null) => {
                    if property.required {
                        issues.push(MapIssue::missing_field(
                            field_path,
                            property.kind.expected(),
                        ));
                    }
                }
                Some(value) => {
                    if let Some(mapped) =
                        self.map_field(&property.kind, property.strict, value, &field_path, issues)
                    {
                        instance.set(property.name, mapped);
                    }
                }
            }
        }

        if self.config.unknown_keys == UnknownKeys::Reject {
            for (key, value) in object {
                if !descriptor.has_json_key(key) {
                    issues.push(MapIssue::unknown_key(path.child(key), JsonKind::of(value)));
                }
            }
        }

        instance
    }

    /// Maps one JSON value against a declared kind. Returns `None`
    /// when the field failed and should keep its default.
    fn map_field(
        &self,
        kind: &Kind,
        strict: bool,
        value: &Value,
        path: &Path,
        issues: &mut Vec<MapIssue>,
    ) -> Option<FieldValue> {
        match kind {
            Kind::Primitive(primitive) => coerce_primitive(*primitive, value, path, issues),
            Kind::Model(nested) => match value.as_object() {
                Some(object) => Some(FieldValue::Model((nested.map_value)(
                    self, object, path, issues,
                ))),
                None => {
                    issues.push(MapIssue::shape_mismatch(
                        path.clone(),
                        "object",
                        JsonKind::of(value),
                    ));
                    None
                }
            },
            Kind::List(element) => self.map_list(element, strict, value, path, issues),
        }
    }

    /// Maps a JSON array element by element. Surviving elements keep
    /// their original order; in strict mode any non-warning element
    /// issue fails the whole field (the issues are still reported).
    fn map_list(
        &self,
        element: &Elem,
        strict: bool,
        value: &Value,
        path: &Path,
        issues: &mut Vec<MapIssue>,
    ) -> Option<FieldValue> {
        let Some(items) = value.as_array() else {
            issues.push(MapIssue::shape_mismatch(
                path.clone(),
                "array",
                JsonKind::of(value),
            ));
            return None;
        };

        let before = issues.len();
        let mut mapped = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let survived = match element {
                Elem::Primitive(primitive) => {
                    coerce_primitive(*primitive, item, &item_path, issues)
                }
                Elem::Model(nested) => match item.as_object() {
                    Some(object) => Some(FieldValue::Model((nested.map_value)(
                        self, object, &item_path, issues,
                    ))),
                    None => {
                        issues.push(MapIssue::shape_mismatch(
                            item_path,
                            "object",
                            JsonKind::of(item),
                        ));
                        None
                    }
                },
            };
            if let Some(element_value) = survived {
                mapped.push(element_value);
            }
        }

        if strict && issues[before..].iter().any(|issue| !issue.is_warning()) {
            return None;
        }
        Some(FieldValue::List(mapped))
    }

    /// Returns the cached descriptor for `M`, resolving it on first
    /// use. Concurrent first-time resolution races are settled by the
    /// write lock: the first insert wins and later callers reuse it.
    pub(crate) fn descriptor<M: Model>(&self) -> Arc<ModelDescriptor> {
        let type_id = TypeId::of::<M>();
        if let Some(descriptor) = self.descriptors.read().get(&type_id) {
            return Arc::clone(descriptor);
        }

        let resolved = Arc::new(ModelDescriptor::of::<M>());
        trace!(
            model = resolved.name(),
            properties = resolved.properties().len(),
            "resolved model descriptor"
        );
        let mut cache = self.descriptors.write();
        Arc::clone(cache.entry(type_id).or_insert(resolved))
    }
}

/// Type-erased object mapping entry point for `M`, stored in
/// [`NestedModel`](crate::descriptor::NestedModel) so the engine can
/// recurse through descriptor tables without reflection.
pub(crate) fn map_erased<M: Model>(
    mapper: &Mapper,
    object: &serde_json::Map<String, Value>,
    path: &Path,
    issues: &mut Vec<MapIssue>,
) -> Box<dyn Any + Send> {
    Box::new(mapper.map_object::<M>(object, path, issues))
}

// ── Primitive coercion ─────────────────────────────────────────────
//
// Precedence per field: exact kind match passes through; JSON number
// into an integer field truncates toward zero (precision-loss warning
// iff the fractional part is non-zero); JSON string into a numeric
// field takes a strict full-consumption parse; boolean and numeric
// never coerce into each other.

fn coerce_primitive(
    primitive: Primitive,
    value: &Value,
    path: &Path,
    issues: &mut Vec<MapIssue>,
) -> Option<FieldValue> {
    let expected = primitive.name();
    match primitive {
        Primitive::Bool => match coerce_bool(value) {
            Ok(v) => Some(FieldValue::Bool(v)),
            Err(message) => {
                issues.push(MapIssue::type_mismatch(
                    path.clone(),
                    expected,
                    JsonKind::of(value),
                    message,
                ));
                None
            }
        },
        Primitive::I64 => match coerce_i64(value) {
            Ok((v, lossy)) => {
                if lossy {
                    issues.push(MapIssue::precision_loss(
                        path.clone(),
                        expected,
                        format!("fractional part of {value} truncated to {v}"),
                    ));
                }
                Some(FieldValue::I64(v))
            }
            Err(message) => {
                issues.push(MapIssue::type_mismatch(
                    path.clone(),
                    expected,
                    JsonKind::of(value),
                    message,
                ));
                None
            }
        },
        Primitive::U64 => match coerce_u64(value) {
            Ok((v, lossy)) => {
                if lossy {
                    issues.push(MapIssue::precision_loss(
                        path.clone(),
                        expected,
                        format!("fractional part of {value} truncated to {v}"),
                    ));
                }
                Some(FieldValue::U64(v))
            }
            Err(message) => {
                issues.push(MapIssue::type_mismatch(
                    path.clone(),
                    expected,
                    JsonKind::of(value),
                    message,
                ));
                None
            }
        },
        Primitive::F64 => match coerce_f64(value) {
            Ok(v) => Some(FieldValue::F64(v)),
            Err(message) => {
                issues.push(MapIssue::type_mismatch(
                    path.clone(),
                    expected,
                    JsonKind::of(value),
                    message,
                ));
                None
            }
        },
        Primitive::Str => match coerce_str(value) {
            Ok(v) => Some(FieldValue::Str(v)),
            Err(message) => {
                issues.push(MapIssue::type_mismatch(
                    path.clone(),
                    expected,
                    JsonKind::of(value),
                    message,
                ));
                None
            }
        },
    }
}

fn coerce_bool(value: &Value) -> Result<bool, String> {
    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    if value.is_number() {
        return Err("number does not coerce to boolean".to_string());
    }
    Err(format!("expected boolean, got {}", JsonKind::of(value)))
}

fn coerce_i64(value: &Value) -> Result<(i64, bool), String> {
    if let Some(n) = value.as_i64() {
        return Ok((n, false));
    }
    if let Some(n) = value.as_u64() {
        return Err(format!("integer {n} out of range for integer field"));
    }
    if let Some(f) = value.as_f64() {
        return float_to_i64(f);
    }
    if let Some(s) = value.as_str() {
        return s
            .parse::<i64>()
            .map(|n| (n, false))
            .map_err(|_| format!("cannot parse '{s}' as integer"));
    }
    if value.is_boolean() {
        return Err("boolean does not coerce to integer".to_string());
    }
    Err(format!("expected integer, got {}", JsonKind::of(value)))
}

fn coerce_u64(value: &Value) -> Result<(u64, bool), String> {
    if let Some(n) = value.as_u64() {
        return Ok((n, false));
    }
    if let Some(n) = value.as_i64() {
        return Err(format!(
            "integer {n} out of range for unsigned integer field"
        ));
    }
    if let Some(f) = value.as_f64() {
        return float_to_u64(f);
    }
    if let Some(s) = value.as_str() {
        return s
            .parse::<u64>()
            .map(|n| (n, false))
            .map_err(|_| format!("cannot parse '{s}' as unsigned integer"));
    }
    if value.is_boolean() {
        return Err("boolean does not coerce to unsigned integer".to_string());
    }
    Err(format!(
        "expected unsigned integer, got {}",
        JsonKind::of(value)
    ))
}

fn coerce_f64(value: &Value) -> Result<f64, String> {
    if let Some(f) = value.as_f64() {
        return Ok(f);
    }
    if let Some(s) = value.as_str() {
        return s
            .parse::<f64>()
            .map_err(|_| format!("cannot parse '{s}' as float"));
    }
    if value.is_boolean() {
        return Err("boolean does not coerce to float".to_string());
    }
    Err(format!("expected float, got {}", JsonKind::of(value)))
}

fn coerce_str(value: &Value) -> Result<String, String> {
    if let Some(s) = value.as_str() {
        return Ok(s.to_string());
    }
    Err(format!("expected string, got {}", JsonKind::of(value)))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn float_to_i64(f: f64) -> Result<(i64, bool), String> {
    let truncated = f.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(format!("number {f} out of range for integer field"));
    }
    Ok((truncated as i64, f.fract() != 0.0))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(f: f64) -> Result<(u64, bool), String> {
    let truncated = f.trunc();
    if !truncated.is_finite() || f < 0.0 || truncated >= u64::MAX as f64 {
        return Err(format!(
            "number {f} out of range for unsigned integer field"
        ));
    }
    Ok((truncated as u64, f.fract() != 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use serde_json::json;

    crate::model! {
        struct Address {
            [required] city: String,
            zip: i64,
        }
    }

    crate::model! {
        struct Customer {
            [required] name: String,
            [required] age: i64,
            score: f64,
            active: bool,
            tags: Vec<String>,
            address: Address,
            nickname: Option<String>,
        }
    }

    // ── Clean mappings ────────────────────────────────────────

    #[test]
    fn test_exact_match_maps_every_field() {
        let mapper = Mapper::new();
        let customer: Customer = mapper
            .map(&json!({
                "name": "bob",
                "age": 41,
                "score": 9.5,
                "active": true,
                "tags": ["a", "b"],
                "address": {"city": "NYC", "zip": 10001},
                "nickname": "bobby",
            }))
            .unwrap();

        assert_eq!(customer.name, "bob");
        assert_eq!(customer.age, 41);
        assert!((customer.score - 9.5).abs() < f64::EPSILON);
        assert!(customer.active);
        assert_eq!(customer.tags, vec!["a", "b"]);
        assert_eq!(customer.address.city, "NYC");
        assert_eq!(customer.address.zip, 10001);
        assert_eq!(customer.nickname.as_deref(), Some("bobby"));
    }

    #[test]
    fn test_idempotent_mapping() {
        let mapper = Mapper::new();
        let payload = json!({"name": "bob", "age": 41});
        let first: Customer = mapper.map(&payload).unwrap();
        let second: Customer = mapper.map(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_optional_fields_default_when_absent_or_null() {
        let mapper = Mapper::new();
        let customer: Customer = mapper
            .map(&json!({"name": "bob", "age": 41, "score": null}))
            .unwrap();
        assert!((customer.score - 0.0).abs() < f64::EPSILON);
        assert!(!customer.active);
        assert!(customer.tags.is_empty());
        assert_eq!(customer.nickname, None);
    }

    // ── Root shape ────────────────────────────────────────────

    #[test]
    fn test_non_object_root_short_circuits() {
        let mapper = Mapper::new();
        let failure = mapper.map::<Customer>(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].kind, IssueKind::ShapeMismatch);
        assert!(failure.issues[0].path.is_root());
        assert_eq!(failure.instance, Customer::default());
    }

    // ── Accumulation and partial success ──────────────────────

    #[test]
    fn test_partial_failure_keeps_good_fields() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"age": "not-a-number", "name": "bob"}))
            .unwrap_err();

        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert_eq!(failure.issues[0].path.to_string(), "age");
        assert_eq!(failure.instance.name, "bob");
        assert_eq!(failure.instance.age, 0);
    }

    #[test]
    fn test_missing_required_field() {
        let mapper = Mapper::new();
        let failure = mapper.map::<Address>(&json!({})).unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].kind, IssueKind::MissingField);
        assert_eq!(failure.issues[0].path.to_string(), "city");
        assert_eq!(failure.instance, Address::default());
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let mapper = Mapper::new();
        let failure = mapper.map::<Address>(&json!({"city": null})).unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::MissingField);
    }

    #[test]
    fn test_multiple_issues_accumulate_in_declaration_order() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"age": true, "active": 1}))
            .unwrap_err();
        let kinds: Vec<_> = failure.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingField, // name
                IssueKind::TypeMismatch, // age
                IssueKind::TypeMismatch, // active
            ]
        );
    }

    // ── Nested models ─────────────────────────────────────────

    #[test]
    fn test_nested_errors_are_path_prefixed_and_partial_instance_assigned() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({
                "name": "bob",
                "age": 1,
                "address": {"city": "NYC", "zip": "bad"},
            }))
            .unwrap_err();

        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].path.to_string(), "address.zip");
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        // The partially populated nested instance is still assigned.
        assert_eq!(failure.instance.address.city, "NYC");
        assert_eq!(failure.instance.address.zip, 0);
    }

    #[test]
    fn test_nested_non_object_is_shape_mismatch() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": 1, "address": 5}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::ShapeMismatch);
        assert_eq!(failure.issues[0].path.to_string(), "address");
        assert_eq!(failure.instance.address, Address::default());
    }

    // ── Collections ───────────────────────────────────────────

    #[test]
    fn test_lossy_collection_keeps_survivors_in_order() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": 1, "tags": ["a", 5, "c"]}))
            .unwrap_err();

        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert_eq!(failure.issues[0].path.to_string(), "tags[1]");
        assert_eq!(failure.instance.tags, vec!["a", "c"]);
    }

    #[test]
    fn test_collection_non_array_is_shape_mismatch() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": 1, "tags": "a"}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::ShapeMismatch);
        assert_eq!(failure.issues[0].path.to_string(), "tags");
        assert!(failure.instance.tags.is_empty());
    }

    crate::model! {
        struct StrictBag {
            [strict] items: Vec<i64>,
        }
    }

    #[test]
    fn test_strict_collection_fails_whole_field() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<StrictBag>(&json!({"items": [1, "x", 3]}))
            .unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].path.to_string(), "items[1]");
        // Whole field is dropped, not just the bad element.
        assert!(failure.instance.items.is_empty());
    }

    #[test]
    fn test_strict_collection_survives_warnings() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<StrictBag>(&json!({"items": [1.5, 3]}))
            .unwrap_err();
        assert!(failure.only_warnings());
        assert_eq!(failure.instance.items, vec![1, 3]);
    }

    crate::model! {
        struct Roster {
            people: Vec<Address>,
        }
    }

    #[test]
    fn test_collection_of_models() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Roster>(&json!({"people": [
                {"city": "NYC", "zip": 1},
                {"zip": 2},
                "not-an-object",
            ]}))
            .unwrap_err();

        let paths: Vec<_> = failure.issues.iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["people[1].city", "people[2]"]);
        // Element 1 mapped partially and survives; element 2 is dropped.
        assert_eq!(failure.instance.people.len(), 2);
        assert_eq!(failure.instance.people[0].city, "NYC");
        assert_eq!(failure.instance.people[1].zip, 2);
    }

    // ── Coercion rules ────────────────────────────────────────

    #[test]
    fn test_float_into_integer_truncates_toward_zero() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": -3.7}))
            .unwrap_err();
        assert!(failure.only_warnings());
        assert_eq!(failure.issues[0].kind, IssueKind::PrecisionLoss);
        assert_eq!(failure.instance.age, -3);
    }

    #[test]
    fn test_whole_float_into_integer_is_clean() {
        let mapper = Mapper::new();
        let customer: Customer = mapper.map(&json!({"name": "b", "age": 41.0})).unwrap();
        assert_eq!(customer.age, 41);
    }

    #[test]
    fn test_string_into_numeric_strict_parse() {
        let mapper = Mapper::new();
        let customer: Customer = mapper
            .map(&json!({"name": "b", "age": "41", "score": "2.5"}))
            .unwrap();
        assert_eq!(customer.age, 41);
        assert!((customer.score - 2.5).abs() < f64::EPSILON);

        // Partial consumption fails.
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": "41x"}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        // A float literal is not fully consumed by an integer parse.
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": "4.5"}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
    }

    #[test]
    fn test_no_truthiness_between_bool_and_numeric() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": 1, "active": 1}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert!(failure.issues[0].message.contains("does not coerce"));

        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": true}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
    }

    #[test]
    fn test_number_into_string_is_rejected() {
        let mapper = Mapper::new();
        let failure = mapper
            .map::<Customer>(&json!({"name": 42, "age": 1}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert_eq!(failure.instance.name, "");
    }

    crate::model! {
        struct Counter {
            count: u64,
        }
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let mapper = Mapper::new();
        let failure = mapper.map::<Counter>(&json!({"count": -1})).unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert!(failure.issues[0].message.contains("out of range"));

        let counter: Counter = mapper.map(&json!({"count": 7})).unwrap();
        assert_eq!(counter.count, 7);
    }

    #[test]
    fn test_integer_overflow_is_type_mismatch() {
        let mapper = Mapper::new();
        // u64::MAX does not fit an i64 field.
        let failure = mapper
            .map::<Customer>(&json!({"name": "b", "age": u64::MAX}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::TypeMismatch);
        assert!(failure.issues[0].message.contains("out of range"));
    }

    // ── Key maps ──────────────────────────────────────────────

    crate::model! {
        struct Login {
            user_name: String,
        }
        keys { "usr_nm" => user_name }
    }

    #[test]
    fn test_key_map_override_applies() {
        let mapper = Mapper::new();
        let login: Login = mapper.map(&json!({"usr_nm": "alice"})).unwrap();
        assert_eq!(login.user_name, "alice");
    }

    #[test]
    fn test_override_suppresses_identity_fallback() {
        let mapper = Mapper::new();
        let login: Login = mapper.map(&json!({"user_name": "alice"})).unwrap();
        assert_eq!(login.user_name, "");
    }

    // ── Unknown keys ──────────────────────────────────────────

    #[test]
    fn test_unknown_keys_ignored_by_default() {
        let mapper = Mapper::new();
        let login: Login = mapper
            .map(&json!({"usr_nm": "alice", "extra": 1}))
            .unwrap();
        assert_eq!(login.user_name, "alice");
    }

    #[test]
    fn test_unknown_keys_reject_policy() {
        let mapper = Mapper::with_config(MapperConfig {
            unknown_keys: UnknownKeys::Reject,
        });
        let failure = mapper
            .map::<Login>(&json!({"usr_nm": "alice", "extra": 1}))
            .unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert_eq!(failure.issues[0].kind, IssueKind::UnknownKey);
        assert_eq!(failure.issues[0].path.to_string(), "extra");
        // The mapped field is still populated.
        assert_eq!(failure.instance.user_name, "alice");
    }

    #[test]
    fn test_reject_treats_overridden_identity_name_as_unknown() {
        let mapper = Mapper::with_config(MapperConfig {
            unknown_keys: UnknownKeys::Reject,
        });
        let failure = mapper
            .map::<Login>(&json!({"user_name": "alice"}))
            .unwrap_err();
        assert_eq!(failure.issues[0].kind, IssueKind::UnknownKey);
    }

    // ── Descriptor cache ──────────────────────────────────────

    #[test]
    fn test_descriptor_cache_populates_lazily() {
        let mapper = Mapper::new();
        assert_eq!(mapper.cached_descriptors(), 0);
        let _: Customer = mapper
            .map(&json!({"name": "b", "age": 1}))
            .unwrap();
        // Address is only resolved once an address object is mapped.
        assert_eq!(mapper.cached_descriptors(), 1);

        let _: Customer = mapper
            .map(&json!({"name": "b", "age": 1, "address": {"city": "x"}}))
            .unwrap();
        assert_eq!(mapper.cached_descriptors(), 2);
    }

    #[test]
    fn test_mapper_is_shareable_across_threads() {
        let mapper = std::sync::Arc::new(Mapper::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mapper = std::sync::Arc::clone(&mapper);
                std::thread::spawn(move || {
                    let customer: Customer = mapper
                        .map(&json!({"name": format!("c{i}"), "age": i}))
                        .unwrap();
                    customer.age
                })
            })
            .collect();
        let mut ages: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ages.sort_unstable();
        assert_eq!(ages, vec![0, 1, 2, 3]);
    }

    // ── Coercion helpers ──────────────────────────────────────

    #[test]
    fn test_float_to_i64_bounds() {
        assert!(float_to_i64(9.3e18).is_err());
        assert!(float_to_i64(-9.3e18).is_err());
        assert_eq!(float_to_i64(-3.7), Ok((-3, true)));
        assert_eq!(float_to_i64(4.0), Ok((4, false)));
    }

    #[test]
    fn test_float_to_u64_bounds() {
        assert!(float_to_u64(-0.5).is_err());
        assert!(float_to_u64(2.0e19).is_err());
        assert_eq!(float_to_u64(3.5), Ok((3, true)));
    }
}
