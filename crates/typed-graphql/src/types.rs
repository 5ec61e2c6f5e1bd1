//! GraphQL-side type model: type descriptors, fields and arguments.

use std::fmt;

use async_graphql_parser::types::{BaseType, Type};
use serde::{Deserialize, Serialize};

/// A GraphQL type reference as written in SDL (`ID`, `[Foo!]`, `String!`).
///
/// Exactly one [`TypeDescriptor::Named`] leaf ends every chain. Derived
/// equality is structural: wrappers must line up one-for-one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A named scalar, enum, object or input type.
    Named(String),
    /// `[inner]`
    List(Box<TypeDescriptor>),
    /// `inner!`
    NonNull(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Named leaf.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap in a list.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wrap in non-null. Wrapping an already non-null type is a no-op.
    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        match inner {
            Self::NonNull(_) => inner,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Identifier of the named leaf.
    #[must_use]
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// `true` for `[T]` and `[T]!`.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }

    /// `true` when the outermost wrapper is non-null.
    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// The type with an outer non-null wrapper removed, if any.
    #[must_use]
    pub fn nullable(&self) -> &Self {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl From<&Type> for TypeDescriptor {
    fn from(ty: &Type) -> Self {
        let base = match &ty.base {
            BaseType::Named(name) => Self::Named(name.to_string()),
            BaseType::List(inner) => Self::list(Self::from(inner.as_ref())),
        };
        if ty.nullable {
            base
        } else {
            Self::non_null(base)
        }
    }
}

/// A declared argument of a root field. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl ArgumentDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A query or mutation root field as declared by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub arguments: Vec<ArgumentDescriptor>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
        }
    }

    /// Append an argument.
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.arguments.push(ArgumentDescriptor::new(name, ty));
        self
    }

    /// Find a declared argument by name.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&ArgumentDescriptor> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}
