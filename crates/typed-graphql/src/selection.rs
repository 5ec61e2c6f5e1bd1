//! Selection-set synthesis and query-text rendering.

use std::fmt;

use crate::host::HostType;
use crate::types::TypeDescriptor;

/// Depth used when no per-type override is configured.
pub const DEFAULT_SELECTION_DEPTH: usize = 3;

/// Fields requested from a composite position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    pub fields: Vec<FieldSelection>,
}

impl SelectionSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deepest nesting level; `0` for an empty set.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.fields.is_empty() {
            return 0;
        }
        1 + self
            .fields
            .iter()
            .map(|field| field.selection.depth())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return Ok(());
        }
        f.write_str("{")?;
        for field in &self.fields {
            write!(f, " {field}")?;
        }
        f.write_str(" }")
    }
}

/// `name: $variable` binding on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentBinding {
    pub name: String,
    pub variable: String,
}

/// A selected field, with optional arguments and sub-selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: String,
    pub arguments: Vec<ArgumentBinding>,
    pub selection: SelectionSet,
}

impl FieldSelection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            selection: SelectionSet::default(),
        }
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (idx, arg) in self.arguments.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ${}", arg.name, arg.variable)?;
            }
            f.write_str(")")?;
        }
        if !self.selection.is_empty() {
            write!(f, " {}", self.selection)?;
        }
        Ok(())
    }
}

/// `$name: Type` in an operation header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}: {}", self.name, self.ty)
    }
}

/// Derive the selection set for `host` down to `max_depth` levels.
///
/// Only model types (or lists of them) produce selections. Fields whose type
/// is not representable are skipped. A model-typed field at the last permitted
/// level is selected by name without expansion. The depth bound is the only
/// protection against self-referential models.
#[must_use]
pub fn synthesize(host: &HostType, max_depth: usize) -> SelectionSet {
    let Some(model) = host.as_model() else {
        return SelectionSet::default();
    };
    if max_depth == 0 {
        return SelectionSet::default();
    }

    let descriptor = model.descriptor();
    let fields = descriptor
        .fields
        .iter()
        .filter(|field| field.ty.is_representable())
        .map(|field| {
            let mut selection = FieldSelection::new(field.mapped_name(descriptor.naming));
            if field.ty.as_model().is_some() {
                selection.selection = synthesize(&field.ty, max_depth - 1);
            }
            selection
        })
        .collect();

    SelectionSet { fields }
}
