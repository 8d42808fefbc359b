//! The `model!` declaration macro.

/// Declares a mapped model struct and generates its
/// [`Model`](crate::Model) and [`ModelField`](crate::ModelField)
/// impls from the field list.
///
/// # Forms
///
/// ```
/// use modelmap::model;
///
/// model! {
///     /// A user account.
///     pub struct User {
///         [required] name: String,
///         [required] age: i64,
///         tags: Vec<String>,
///     }
/// }
///
/// model! {
///     pub struct Account {
///         user_name: String,
///     }
///     keys { "usr_nm" => user_name }
/// }
/// ```
///
/// # Field flags
///
/// - `[required]` — absent or `null` values report a missing-field
///   issue instead of leaving the default
/// - `[strict]` — on collections: any element failure fails the
///   whole field
/// - `[required, strict]` — both
///
/// # Key map
///
/// The optional trailing `keys { "json_key" => property, ... }` block
/// overrides the identity key for the named properties; properties
/// not listed keep their own name as the JSON key.
///
/// The generated struct derives `Debug`, `Clone`, `Default`, and
/// `PartialEq`; every field type must implement
/// [`ModelField`](crate::ModelField), which holds for the primitive
/// leaves, `Option<T>`, `Vec<T>`, and any type declared via `model!`.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $([$($flag:ident),+ $(,)?])? $fname:ident : $fty:ty
            ),* $(,)?
        }
        $( keys { $( $json:literal => $prop:ident ),+ $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $fname: $fty,
            )*
        }

        impl $crate::Model for $name {
            fn model_name() -> &'static str {
                stringify!($name)
            }

            $(
                fn key_map() -> $crate::KeyMap {
                    $crate::KeyMap::from_pairs([
                        $( ($json, stringify!($prop)) ),+
                    ])
                }
            )?

            fn properties() -> Vec<$crate::PropertyDescriptor> {
                vec![
                    $(
                        $crate::PropertyDescriptor::new(
                            stringify!($fname),
                            <$fty as $crate::ModelField>::kind(),
                        ) $($( . $flag () )+)?,
                    )*
                ]
            }

            fn set(&mut self, property: &str, value: $crate::FieldValue) {
                match property {
                    $(
                        stringify!($fname) => {
                            if let Some(v) = <$fty as $crate::ModelField>::from_field(value) {
                                self.$fname = v;
                            }
                        }
                    )*
                    _ => {}
                }
            }

            fn get(&self, property: &str) -> Option<$crate::FieldValue> {
                match property {
                    $(
                        stringify!($fname) => $crate::ModelField::to_field(&self.$fname),
                    )*
                    _ => None,
                }
            }
        }

        impl $crate::ModelField for $name {
            fn kind() -> $crate::Kind {
                $crate::model::nested_kind::<Self>()
            }

            fn from_field(value: $crate::FieldValue) -> Option<Self> {
                match value {
                    $crate::FieldValue::Model(erased) => {
                        erased.downcast::<Self>().ok().map(|boxed| *boxed)
                    }
                    _ => None,
                }
            }

            fn to_field(&self) -> Option<$crate::FieldValue> {
                Some($crate::FieldValue::Model(Box::new(self.clone())))
            }
        }
    };
}
