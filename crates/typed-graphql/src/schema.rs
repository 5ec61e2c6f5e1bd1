//! SDL adapter: turns schema text into root-field descriptors and a catalogue
//! of named types.

use std::collections::{BTreeMap, HashMap};

use async_graphql_parser::parse_schema;
use async_graphql_parser::types::{FieldDefinition, TypeKind, TypeSystemDefinition};
use thiserror::Error;

use crate::types::{ArgumentDescriptor, FieldDescriptor, TypeDescriptor};

const BUILTIN_SCALARS: [&str; 5] = ["ID", "String", "Int", "Float", "Boolean"];

/// Errors raised while reading schema text.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The SDL could not be parsed.
    #[error("failed to parse GraphQL schema: {0}")]
    Parse(String),
}

/// Kind of a named type declared by a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedTypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl From<&TypeKind> for NamedTypeKind {
    fn from(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Scalar => Self::Scalar,
            TypeKind::Object(_) => Self::Object,
            TypeKind::Interface(_) => Self::Interface,
            TypeKind::Union(_) => Self::Union,
            TypeKind::Enum(_) => Self::Enum,
            TypeKind::InputObject(_) => Self::InputObject,
        }
    }
}

/// A parsed schema, reduced to what the client needs.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    queries: Vec<FieldDescriptor>,
    mutations: Vec<FieldDescriptor>,
    types: BTreeMap<String, NamedTypeKind>,
}

impl SchemaDocument {
    /// Parse SDL text.
    pub fn parse(sdl: &str) -> Result<Self, SchemaError> {
        let document = parse_schema(sdl).map_err(|err| SchemaError::Parse(err.to_string()))?;

        let mut query_root = "Query".to_string();
        let mut mutation_root = "Mutation".to_string();
        let mut object_fields: HashMap<String, Vec<FieldDescriptor>> = HashMap::new();
        let mut types = BTreeMap::new();

        for scalar in BUILTIN_SCALARS {
            types.insert(scalar.to_string(), NamedTypeKind::Scalar);
        }

        for definition in &document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema) => {
                    if let Some(query) = &schema.node.query {
                        query_root = query.node.to_string();
                    }
                    if let Some(mutation) = &schema.node.mutation {
                        mutation_root = mutation.node.to_string();
                    }
                }
                TypeSystemDefinition::Type(ty) => {
                    let name = ty.node.name.node.to_string();
                    types.insert(name.clone(), NamedTypeKind::from(&ty.node.kind));
                    if let TypeKind::Object(object) = &ty.node.kind {
                        object_fields
                            .entry(name)
                            .or_default()
                            .extend(object.fields.iter().map(|field| field_descriptor(&field.node)));
                    }
                }
                TypeSystemDefinition::Directive(_) => {}
            }
        }

        Ok(Self {
            queries: object_fields.remove(&query_root).unwrap_or_default(),
            mutations: object_fields.remove(&mutation_root).unwrap_or_default(),
            types,
        })
    }

    /// Query root fields in declaration order.
    #[must_use]
    pub fn query_fields(&self) -> &[FieldDescriptor] {
        &self.queries
    }

    /// Mutation root fields in declaration order.
    #[must_use]
    pub fn mutation_fields(&self) -> &[FieldDescriptor] {
        &self.mutations
    }

    #[must_use]
    pub fn query_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.queries.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn mutation_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.mutations.iter().find(|field| field.name == name)
    }

    /// Query root first, then mutation root.
    #[must_use]
    pub fn root_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.query_field(name).or_else(|| self.mutation_field(name))
    }

    /// All named types, including the built-in scalars.
    pub fn named_types(&self) -> impl Iterator<Item = (&str, NamedTypeKind)> {
        self.types.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn type_kind(&self, name: &str) -> Option<NamedTypeKind> {
        self.types.get(name).copied()
    }
}

fn field_descriptor(field: &FieldDefinition) -> FieldDescriptor {
    FieldDescriptor {
        name: field.name.node.to_string(),
        ty: TypeDescriptor::from(&field.ty.node),
        arguments: field
            .arguments
            .iter()
            .map(|arg| {
                ArgumentDescriptor::new(
                    arg.node.name.node.to_string(),
                    TypeDescriptor::from(&arg.node.ty.node),
                )
            })
            .collect(),
    }
}
