//! # modelmap
//!
//! Declarative JSON-to-model mapping: model types register a
//! compile-time property table (via the [`model!`] macro or a
//! hand-written [`Model`] impl) and gain automatic population from an
//! already-parsed [`serde_json::Value`] into strongly-typed fields,
//! including nested model graphs and collections.
//!
//! - **Descriptors** ([`descriptor`]) — property tables, key-map
//!   overrides, and the resolved per-type view the engine walks
//! - **Engine** ([`mapper`]) — recursive descent, primitive coercion,
//!   and the synchronized per-type descriptor cache
//! - **Diagnostics** ([`error`]) — path-qualified, accumulated issues;
//!   one malformed field never prevents mapping the rest
//! - **Inverse mapping** ([`encoder`]) — instances back to JSON
//!   through the key-map inverse
//!
//! # Architecture
//!
//! ```text
//! Mapper::map::<M>(value)
//!   ├── descriptor cache ── ModelDescriptor::of::<M>()
//!   │                         (key map ∘ property table, once per type)
//!   └── per property, in declaration order:
//!         primitive  → coerce (exact / truncate / strict parse)
//!         model      → recurse, path-prefix child issues
//!         collection → per element, index-qualified paths
//!   → Ok(instance) | Err(MapFailure { instance, issues })
//! ```
//!
//! # Example
//!
//! ```
//! use modelmap::{model, Mapper};
//! use serde_json::json;
//!
//! model! {
//!     struct User {
//!         [required] name: String,
//!         age: i64,
//!     }
//!     keys { "usr_nm" => name }
//! }
//!
//! let mapper = Mapper::new();
//! let user: User = mapper.map(&json!({"usr_nm": "alice", "age": 30})).unwrap();
//! assert_eq!(user.name, "alice");
//! assert_eq!(user.age, 30);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod descriptor;
pub mod encoder;
pub mod error;
#[macro_use]
pub mod macros;
pub mod mapper;
pub mod model;
pub mod path;

// ── Re-exports for convenience ─────────────────────────────────────

pub use descriptor::{
    Elem, KeyMap, Kind, ModelDescriptor, NestedModel, Primitive, PropertyDescriptor,
    ResolvedProperty,
};
pub use error::{IssueKind, JsonKind, MapFailure, MapIssue, MapResult};
pub use mapper::{Mapper, MapperConfig, UnknownKeys};
pub use model::{FieldValue, Model, ModelField};
pub use path::{Path, Segment};
