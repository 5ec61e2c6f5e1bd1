//! Host-side type descriptors.
//!
//! Every Rust type that crosses the GraphQL boundary (result types, argument
//! types and the fields of models) declares its shape by implementing
//! [`GraphqlType`]. Models describe their fields through a
//! [`ModelDescriptor`]; the descriptor is produced lazily so models may refer
//! to themselves.
//!
//! ```
//! use typed_graphql::{GraphqlType, HostType, ModelDescriptor, NamingStrategy};
//!
//! struct Viewer {
//!     id: String,
//!     display_name: String,
//! }
//!
//! impl GraphqlType for Viewer {
//!     fn host_type() -> HostType {
//!         HostType::model("Viewer", || {
//!             ModelDescriptor::new("Viewer")
//!                 .with_naming(NamingStrategy::LowerCamelCase)
//!                 .field::<String>("id")
//!                 .field::<String>("display_name")
//!         })
//!     }
//! }
//!
//! assert_eq!(Viewer::host_type().name(), "Viewer");
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalars a host value may map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int,
    Float,
    Boolean,
    DateTime,
    String,
}

impl ScalarKind {
    /// Canonical GraphQL name.
    #[must_use]
    pub const fn graphql_name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::String => "String",
        }
    }
}

/// GraphQL scalars that are valid in any schema without a host model.
pub const SUPPORTED_SCALARS: [&str; 6] = ["ID", "String", "Int", "Float", "Boolean", "DateTime"];

/// Returns `true` if `name` is one of [`SUPPORTED_SCALARS`].
#[must_use]
pub fn is_supported_scalar(name: &str) -> bool {
    SUPPORTED_SCALARS.contains(&name)
}

/// Field naming applied to every field of a model without an explicit rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NamingStrategy {
    /// Use the Rust field name unchanged.
    #[default]
    Identity,
    /// `display_name` becomes `displayName`.
    LowerCamelCase,
}

impl NamingStrategy {
    /// Apply the strategy to a raw field name.
    #[must_use]
    pub fn apply(self, raw: &str) -> String {
        match self {
            Self::Identity => raw.to_string(),
            Self::LowerCamelCase => lower_camel_case(raw),
        }
    }
}

fn lower_camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut upper_next = false;
    for ch in raw.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = false;
    }
    out
}

/// Lazy handle on a model's descriptor.
#[derive(Clone, Copy)]
pub struct ModelRef {
    name: &'static str,
    describe: fn() -> ModelDescriptor,
}

impl ModelRef {
    /// Declared model name. Matches a GraphQL named type by identity.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Build the full descriptor.
    #[must_use]
    pub fn descriptor(&self) -> ModelDescriptor {
        (self.describe)()
    }
}

impl fmt::Debug for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelRef").field(&self.name).finish()
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ModelRef {}

/// Shape of a host type as seen by the matcher and the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostType {
    /// A host scalar.
    Scalar(ScalarKind),
    /// A model with named fields.
    Model(ModelRef),
    /// A host enum; selected as a leaf.
    Enum(&'static str),
    /// A homogeneous sequence.
    List(Box<HostType>),
    /// A declared type that is not representable in GraphQL.
    Opaque(&'static str),
}

impl HostType {
    /// Model constructor used by [`GraphqlType`] impls.
    #[must_use]
    pub const fn model(name: &'static str, describe: fn() -> ModelDescriptor) -> Self {
        Self::Model(ModelRef { name, describe })
    }

    /// List of `element`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Element type after removing every list layer.
    #[must_use]
    pub fn element(&self) -> &Self {
        match self {
            Self::List(inner) => inner.element(),
            other => other,
        }
    }

    /// Name used in diagnostics and for identity matching.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.graphql_name().to_string(),
            Self::Model(model) => model.name().to_string(),
            Self::Enum(name) | Self::Opaque(name) => (*name).to_string(),
            Self::List(inner) => format!("[{}]", inner.name()),
        }
    }

    /// `true` for scalars, models, enums and lists of those.
    #[must_use]
    pub fn is_representable(&self) -> bool {
        match self {
            Self::Scalar(_) | Self::Model(_) | Self::Enum(_) => true,
            Self::List(inner) => inner.is_representable(),
            Self::Opaque(_) => false,
        }
    }

    /// `true` for host scalars (after list unwrapping).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.element(), Self::Scalar(_))
    }

    /// The model behind this type (after list unwrapping), if any.
    #[must_use]
    pub fn as_model(&self) -> Option<&ModelRef> {
        match self.element() {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// One field of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelField {
    /// Rust field name.
    pub name: &'static str,
    /// Explicit GraphQL name; takes precedence over the naming strategy.
    pub rename: Option<&'static str>,
    pub ty: HostType,
}

impl ModelField {
    /// Name this field carries on the wire.
    #[must_use]
    pub fn mapped_name(&self, naming: NamingStrategy) -> String {
        self.rename
            .map_or_else(|| naming.apply(self.name), str::to_string)
    }
}

/// Declared shape of a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: &'static str,
    pub naming: NamingStrategy,
    pub fields: Vec<ModelField>,
}

impl ModelDescriptor {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            naming: NamingStrategy::Identity,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Declare a field whose GraphQL name follows the naming strategy.
    #[must_use]
    pub fn field<T: GraphqlType + ?Sized>(mut self, name: &'static str) -> Self {
        self.fields.push(ModelField {
            name,
            rename: None,
            ty: T::host_type(),
        });
        self
    }

    /// Declare a field with an explicit GraphQL name.
    #[must_use]
    pub fn renamed_field<T: GraphqlType + ?Sized>(
        mut self,
        name: &'static str,
        graphql_name: &'static str,
    ) -> Self {
        self.fields.push(ModelField {
            name,
            rename: Some(graphql_name),
            ty: T::host_type(),
        });
        self
    }

    /// Find a field by its mapped (wire) name.
    #[must_use]
    pub fn field_by_mapped_name(&self, mapped: &str) -> Option<&ModelField> {
        self.fields
            .iter()
            .find(|field| field.mapped_name(self.naming) == mapped)
    }
}

/// Declared GraphQL shape of a host type.
///
/// GraphQL `Int` is a signed 32-bit integer, so only integer types that fit
/// in one are `Int` hosts. `u32` and `i64` are not:
///
/// ```compile_fail
/// fn host<T: typed_graphql::GraphqlType>() {}
/// host::<u32>();
/// ```
///
/// ```compile_fail
/// fn host<T: typed_graphql::GraphqlType>() {}
/// host::<i64>();
/// ```
pub trait GraphqlType {
    fn host_type() -> HostType;
}

macro_rules! scalar_types {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl GraphqlType for $ty {
                fn host_type() -> HostType {
                    HostType::Scalar(ScalarKind::$kind)
                }
            }
        )+
    };
}

scalar_types!(Int => i8, i16, i32, u8, u16);
scalar_types!(Float => f32, f64);
scalar_types!(Boolean => bool);
scalar_types!(String => String, str);
scalar_types!(DateTime => DateTime<Utc>, NaiveDateTime);

impl<T: GraphqlType> GraphqlType for Vec<T> {
    fn host_type() -> HostType {
        HostType::list(T::host_type())
    }
}

impl<T: GraphqlType> GraphqlType for [T] {
    fn host_type() -> HostType {
        HostType::list(T::host_type())
    }
}

impl<T: GraphqlType> GraphqlType for Option<T> {
    fn host_type() -> HostType {
        T::host_type()
    }
}

impl<T: GraphqlType + ?Sized> GraphqlType for &T {
    fn host_type() -> HostType {
        T::host_type()
    }
}

impl<T: GraphqlType + ?Sized> GraphqlType for Box<T> {
    fn host_type() -> HostType {
        T::host_type()
    }
}
