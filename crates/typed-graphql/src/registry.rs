//! Name-keyed registry of the operations a client may call.

use std::collections::BTreeMap;

use tracing::debug;

use crate::operation::OperationKind;
use crate::schema::{SchemaDocument, SchemaError};
use crate::types::FieldDescriptor;

/// Query and mutation root fields, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    queries: BTreeMap<String, FieldDescriptor>,
    mutations: BTreeMap<String, FieldDescriptor>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `sdl` and merge its root fields. Same-named entries are replaced.
    pub fn load(&mut self, sdl: &str) -> Result<(), SchemaError> {
        let schema = SchemaDocument::parse(sdl)?;
        self.merge(&schema);
        Ok(())
    }

    /// Merge the root fields of an already parsed schema.
    pub fn merge(&mut self, schema: &SchemaDocument) {
        for field in schema.query_fields() {
            self.queries.insert(field.name.clone(), field.clone());
        }
        for field in schema.mutation_fields() {
            self.mutations.insert(field.name.clone(), field.clone());
        }
        debug!(
            queries = self.queries.len(),
            mutations = self.mutations.len(),
            "field registry loaded"
        );
    }

    /// Build a registry from one schema text.
    pub fn from_schema(sdl: &str) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.load(sdl)?;
        Ok(registry)
    }

    /// Queries win over mutations of the same name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&FieldDescriptor, OperationKind)> {
        self.queries
            .get(name)
            .map(|field| (field, OperationKind::Query))
            .or_else(|| {
                self.mutations
                    .get(name)
                    .map(|field| (field, OperationKind::Mutation))
            })
    }

    /// Every registered field, queries first.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, OperationKind)> {
        self.queries
            .values()
            .map(|field| (field, OperationKind::Query))
            .chain(
                self.mutations
                    .values()
                    .map(|field| (field, OperationKind::Mutation)),
            )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len() + self.mutations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_checks_queries_then_mutations() {
        let registry = FieldRegistry::from_schema(
            "type Query { item(id: ID!): Int shared: Int } type Mutation { drop: Int shared: String }",
        )
        .expect("registry");

        let (field, kind) = registry.lookup("drop").expect("drop");
        assert_eq!(kind, OperationKind::Mutation);
        assert_eq!(field.name, "drop");

        let (field, kind) = registry.lookup("shared").expect("shared");
        assert_eq!(kind, OperationKind::Query);
        assert_eq!(field.ty.to_string(), "Int");

        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn reloading_overwrites_same_name() {
        let mut registry = FieldRegistry::from_schema("type Query { item: Int }").expect("first");
        registry
            .load("type Query { item: String other: Int }")
            .expect("second");
        let (field, _) = registry.lookup("item").expect("item");
        assert_eq!(field.ty.to_string(), "String");
        assert!(registry.lookup("other").is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn fields_lists_queries_first() {
        let registry =
            FieldRegistry::from_schema("type Query { b: Int } type Mutation { a: Int }")
                .expect("registry");
        let kinds: Vec<_> = registry.fields().map(|(_, kind)| kind).collect();
        assert_eq!(kinds, [OperationKind::Query, OperationKind::Mutation]);
    }

    #[test]
    fn bad_schema_leaves_registry_untouched() {
        let mut registry = FieldRegistry::from_schema("type Query { a: Int }").expect("registry");
        assert!(registry.load("type Query {").is_err());
        assert_eq!(registry.len(), 1);
    }
}
