//! Pre-deployment compatibility check of client operations against a
//! reference schema.
//!
//! Every problem is collected; nothing stops at the first failure.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::error::GraphqlClientError;
use crate::host::{GraphqlType, HostType, is_supported_scalar};
use crate::schema::SchemaDocument;
use crate::types::{FieldDescriptor, TypeDescriptor};

/// Aggregated outcome of a validation pass, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn merge(&mut self, other: impl IntoIterator<Item = String>) {
        self.errors.extend(other);
    }

    /// `Ok(())` when empty, otherwise [`GraphqlClientError::SchemaValidation`]
    /// carrying every message.
    pub fn into_result(self) -> Result<(), GraphqlClientError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(GraphqlClientError::SchemaValidation {
            message: format!("{} incompatibilities with schema", self.errors.len()),
            errors: self.errors,
        })
    }
}

/// Decides whether a GraphQL type used by an operation is backed by host
/// models the schema can satisfy.
pub trait TypeOracle {
    /// Messages describing every problem with `ty`; empty when valid.
    fn check(&self, ty: &TypeDescriptor, schema: &SchemaDocument) -> Vec<String>;
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    namespace: String,
    host: HostType,
}

/// Explicit name → host type registry, built at configuration time.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: BTreeMap<String, Vec<CatalogEntry>>,
}

impl ModelCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `namespace`, keyed by its host type name.
    #[must_use]
    pub fn register<T: GraphqlType + ?Sized>(self, namespace: impl Into<String>) -> Self {
        self.register_host(namespace, T::host_type())
    }

    #[must_use]
    pub fn register_host(mut self, namespace: impl Into<String>, host: HostType) -> Self {
        self.entries
            .entry(host.element().name())
            .or_default()
            .push(CatalogEntry {
                namespace: namespace.into(),
                host,
            });
        self
    }

    /// First entry named `name` whose namespace is allowed.
    #[must_use]
    pub fn resolve(&self, name: &str, namespaces: &[String]) -> Option<&HostType> {
        self.entries
            .get(name)?
            .iter()
            .find(|entry| namespaces.iter().any(|ns| *ns == entry.namespace))
            .map(|entry| &entry.host)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// [`TypeOracle`] over a [`ModelCatalog`] restricted to an allow-list of
/// namespaces.
#[derive(Debug, Clone)]
pub struct CatalogOracle {
    catalog: ModelCatalog,
    namespaces: Vec<String>,
}

impl CatalogOracle {
    #[must_use]
    pub fn new<I, S>(catalog: ModelCatalog, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalog,
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    fn check_host(
        host: &HostType,
        schema: &SchemaDocument,
        visited: &mut HashSet<String>,
        errors: &mut Vec<String>,
    ) {
        match host.element() {
            HostType::Scalar(_) | HostType::Enum(_) | HostType::List(_) => {}
            HostType::Opaque(name) => errors.push(format!("Type {name} isn't a GraphQL type.")),
            HostType::Model(model) => {
                if !visited.insert(model.name().to_string()) {
                    return;
                }
                for field in model.descriptor().fields {
                    let element = field.ty.element();
                    if element.is_scalar() || matches!(element, HostType::Enum(_)) {
                        continue;
                    }
                    // Fields whose type the schema does not know are not checked.
                    if schema.has_type(&element.name()) {
                        Self::check_host(element, schema, visited, errors);
                    }
                }
            }
        }
    }
}

impl TypeOracle for CatalogOracle {
    fn check(&self, ty: &TypeDescriptor, schema: &SchemaDocument) -> Vec<String> {
        let name = ty.named_type();
        if is_supported_scalar(name) {
            return Vec::new();
        }
        let Some(host) = self.catalog.resolve(name, &self.namespaces) else {
            return vec![format!("Type {name} can't be found as a host type.")];
        };
        let mut errors = Vec::new();
        Self::check_host(host, schema, &mut HashSet::new(), &mut errors);
        errors
    }
}

/// Compares client field descriptors with a reference schema.
pub struct SchemaValidator<'a> {
    oracle: &'a dyn TypeOracle,
}

impl<'a> SchemaValidator<'a> {
    #[must_use]
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self { oracle }
    }

    /// Validate every field; the report lists all failures in visiting order.
    pub fn validate_all<'f>(
        &self,
        fields: impl IntoIterator<Item = &'f FieldDescriptor>,
        schema: &SchemaDocument,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut checked = 0_usize;
        for field in fields {
            checked += 1;
            report.merge(self.validate_field(field, schema).errors);
        }

        if report.is_ok() {
            info!(fields = checked, "schema validation passed");
        } else {
            warn!(
                fields = checked,
                failures = report.errors.len(),
                "schema validation failed"
            );
        }
        report
    }

    /// Validate one field.
    pub fn validate_field(
        &self,
        field: &FieldDescriptor,
        schema: &SchemaDocument,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        let Some(reference) = schema.root_field(&field.name) else {
            report.push(format!("{} not found in schema.", field.name));
            return report;
        };

        if field.ty != reference.ty {
            report.push(format!(
                "Result type of {} does not match result type in schema.",
                field.name
            ));
        }
        report.merge(self.oracle.check(&field.ty, schema));

        for arg in &field.arguments {
            let Some(reference_arg) = reference.argument(&arg.name) else {
                report.push(format!(
                    "For {}, couldn't find schema argument matching {}.",
                    field.name, arg.name
                ));
                continue;
            };
            if arg.ty != reference_arg.ty {
                report.push(format!(
                    "Argument {} of {} does not match type in schema",
                    arg.name, field.name
                ));
                continue;
            }
            report.merge(self.oracle.check(&arg.ty, schema));
        }

        report
    }
}
