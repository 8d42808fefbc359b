//! Mapping diagnostics.
//!
//! Provides [`MapIssue`] for individual field-level findings,
//! [`MapFailure`] for a completed mapping that accumulated issues, and
//! a convenience [`MapResult`] alias.
//!
//! Field-level issues never abort sibling-field processing: the engine
//! records them and continues, so one malformed field never prevents
//! mapping the rest of a payload. Only a root-level shape mismatch
//! short-circuits a `map` call.

use std::fmt;

use thiserror::Error;

use crate::path::Path;

/// Result alias for mapping operations.
///
/// The error side carries the best-effort populated instance alongside
/// the full diagnostic list, so callers choose between strict-reject
/// and accept-with-warnings workflows.
pub type MapResult<M> = Result<M, MapFailure<M>>;

/// The JSON kind of a value, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Any JSON number.
    Number,
    /// A JSON string.
    String,
    /// An ordered sequence.
    Array,
    /// A string-keyed mapping.
    Object,
}

impl JsonKind {
    /// Classifies a parsed JSON value.
    #[must_use]
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Bool,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

/// Classification of a mapping issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A value (root or nested) is not the expected JSON kind.
    ShapeMismatch,
    /// A required property had no value (key absent or `null`).
    MissingField,
    /// A leaf value could not be coerced to the declared primitive.
    TypeMismatch,
    /// Warning: a coercion succeeded but lost precision
    /// (fractional part truncated toward zero).
    PrecisionLoss,
    /// A JSON key matched no declared property. Only produced under
    /// [`UnknownKeys::Reject`](crate::mapper::UnknownKeys::Reject);
    /// unknown keys are ignored by default.
    UnknownKey,
}

impl IssueKind {
    /// Returns `true` for warning-level kinds that do not indicate a
    /// failed field (the value was still assigned).
    #[must_use]
    pub fn is_warning(self) -> bool {
        matches!(self, Self::PrecisionLoss)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ShapeMismatch => "shape mismatch",
            Self::MissingField => "missing field",
            Self::TypeMismatch => "type mismatch",
            Self::PrecisionLoss => "precision loss",
            Self::UnknownKey => "unknown key",
        };
        f.write_str(s)
    }
}

/// One field-level mapping finding.
///
/// Created at the point of failure, path-qualified as it bubbles out
/// of nested models and collection elements, never silently discarded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} at {path}: {message}")]
pub struct MapIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Dot/bracket-qualified location of the field.
    pub path: Path,
    /// The declared target type, e.g. `"integer"` or `"object"`.
    pub expected: &'static str,
    /// The JSON kind actually found.
    pub actual: JsonKind,
    /// Human-readable detail.
    pub message: String,
}

impl MapIssue {
    /// A value was not the expected JSON kind.
    #[must_use]
    pub fn shape_mismatch(path: Path, expected: &'static str, actual: JsonKind) -> Self {
        Self {
            kind: IssueKind::ShapeMismatch,
            path,
            expected,
            actual,
            message: format!("expected {expected}, got {actual}"),
        }
    }

    /// A required property had no value.
    #[must_use]
    pub fn missing_field(path: Path, expected: &'static str) -> Self {
        Self {
            kind: IssueKind::MissingField,
            path,
            expected,
            actual: JsonKind::Null,
            message: format!("required {expected} property has no value"),
        }
    }

    /// A leaf value failed coercion.
    #[must_use]
    pub fn type_mismatch(
        path: Path,
        expected: &'static str,
        actual: JsonKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: IssueKind::TypeMismatch,
            path,
            expected,
            actual,
            message: message.into(),
        }
    }

    /// A coercion succeeded but truncated the value.
    #[must_use]
    pub fn precision_loss(
        path: Path,
        expected: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: IssueKind::PrecisionLoss,
            path,
            expected,
            actual: JsonKind::Number,
            message: message.into(),
        }
    }

    /// A JSON key matched no declared property.
    #[must_use]
    pub fn unknown_key(path: Path, actual: JsonKind) -> Self {
        Self {
            kind: IssueKind::UnknownKey,
            path,
            expected: "declared property",
            actual,
            message: "key matches no declared property".to_string(),
        }
    }

    /// Returns `true` for warning-level issues.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.kind.is_warning()
    }
}

/// A completed mapping that accumulated at least one issue.
///
/// Carries the best-effort populated instance: fields that mapped
/// cleanly are set, failed fields are left at their defaults. Whether
/// a partial result is acceptable is the caller's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFailure<M> {
    /// Name of the model type being mapped.
    pub model: &'static str,
    /// The partially populated instance.
    pub instance: M,
    /// All accumulated issues, in field-declaration order. Non-empty.
    pub issues: Vec<MapIssue>,
}

impl<M> MapFailure<M> {
    /// Returns `true` if every accumulated issue is warning-level
    /// (currently only [`IssueKind::PrecisionLoss`]), i.e. every field
    /// was assigned a value.
    #[must_use]
    pub fn only_warnings(&self) -> bool {
        self.issues.iter().all(MapIssue::is_warning)
    }

    /// Splits the failure into the instance and its issue list.
    #[must_use]
    pub fn into_parts(self) -> (M, Vec<MapIssue>) {
        (self.instance, self.issues)
    }
}

impl<M: fmt::Debug> fmt::Display for MapFailure<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mapping {} produced {} issue(s)",
            self.model,
            self.issues.len()
        )?;
        if let Some(first) = self.issues.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl<M: fmt::Debug> std::error::Error for MapFailure<M> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = MapIssue::type_mismatch(
            Path::root().child("age"),
            "integer",
            JsonKind::String,
            "cannot parse 'abc' as integer",
        );
        assert_eq!(
            issue.to_string(),
            "type mismatch at age: cannot parse 'abc' as integer"
        );
    }

    #[test]
    fn test_missing_field_is_null_kind() {
        let issue = MapIssue::missing_field(Path::root().child("name"), "string");
        assert_eq!(issue.actual, JsonKind::Null);
        assert!(issue.to_string().contains("required string property"));
    }

    #[test]
    fn test_precision_loss_is_warning() {
        let issue = MapIssue::precision_loss(
            Path::root().child("count"),
            "integer",
            "3.5 truncated to 3",
        );
        assert!(issue.is_warning());
        assert!(!MapIssue::missing_field(Path::root(), "string").is_warning());
    }

    #[test]
    fn test_json_kind_classification() {
        use serde_json::json;
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
        assert_eq!(JsonKind::of(&json!(true)), JsonKind::Bool);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&json!("x")), JsonKind::String);
        assert_eq!(JsonKind::of(&json!([])), JsonKind::Array);
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
    }

    #[test]
    fn test_failure_only_warnings() {
        let warn = MapIssue::precision_loss(Path::root().child("x"), "integer", "lossy");
        let hard = MapIssue::missing_field(Path::root().child("y"), "string");

        let soft_failure = MapFailure {
            model: "Sample",
            instance: (),
            issues: vec![warn.clone()],
        };
        assert!(soft_failure.only_warnings());

        let hard_failure = MapFailure {
            model: "Sample",
            instance: (),
            issues: vec![warn, hard],
        };
        assert!(!hard_failure.only_warnings());
    }

    #[test]
    fn test_failure_display_names_model_and_first_issue() {
        let failure = MapFailure {
            model: "User",
            instance: (),
            issues: vec![MapIssue::missing_field(Path::root().child("name"), "string")],
        };
        let rendered = failure.to_string();
        assert!(rendered.contains("User"));
        assert!(rendered.contains("1 issue(s)"));
        assert!(rendered.contains("missing field at name"));
    }
}
