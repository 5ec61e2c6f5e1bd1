//! Request construction from a field descriptor and positional arguments.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::compat::is_compatible;
use crate::error::ExceptionalError;
use crate::host::{GraphqlType, HostType};
use crate::operation::{GraphqlQuery, GraphqlRequest, OperationKind};
use crate::selection::{
    ArgumentBinding, DEFAULT_SELECTION_DEPTH, FieldSelection, VariableDefinition, synthesize,
};
use crate::types::FieldDescriptor;

/// A positional argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Host-language null; omitted from the request when the slot is nullable.
    Absent,
    /// A value with its declared host type.
    Present {
        host_type: HostType,
        /// JSON encoding of the value, or the encoder's message.
        value: Result<Value, String>,
    },
}

impl Argument {
    /// Encode `value` as an argument.
    ///
    /// A value that encodes to JSON `null` (such as `None`) is absent.
    pub fn new<T: GraphqlType + Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Null) => Self::Absent,
            value => Self::Present {
                host_type: T::host_type(),
                value: value.map_err(|err| err.to_string()),
            },
        }
    }

    /// An absent slot.
    #[must_use]
    pub const fn absent() -> Self {
        Self::Absent
    }

    /// `None` becomes [`Argument::Absent`].
    pub fn optional<T: GraphqlType + Serialize>(value: Option<&T>) -> Self {
        value.map_or(Self::Absent, Self::new)
    }

    /// `false` for [`Argument::Absent`] and for a present JSON `null`.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Present { value, .. } => !matches!(value, Ok(Value::Null)),
        }
    }
}

/// Builds self-contained requests. Pure: no state beyond configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    selection_depth: usize,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            selection_depth: DEFAULT_SELECTION_DEPTH,
        }
    }
}

impl RequestBuilder {
    #[must_use]
    pub const fn new(selection_depth: usize) -> Self {
        Self { selection_depth }
    }

    #[must_use]
    pub const fn selection_depth(&self) -> usize {
        self.selection_depth
    }

    /// Build a request for field `name` returning `R`.
    ///
    /// `name` and `operation_name` are expected to be non-blank; the client
    /// checks that before calling.
    pub fn build<R: GraphqlType + ?Sized>(
        &self,
        name: &str,
        operation_name: &str,
        kind: OperationKind,
        field: &FieldDescriptor,
        args: &[Argument],
    ) -> Result<GraphqlRequest, ExceptionalError> {
        self.build_for(&R::host_type(), name, operation_name, kind, field, args)
    }

    /// [`RequestBuilder::build`] with an explicit result host type.
    pub fn build_for(
        &self,
        result: &HostType,
        name: &str,
        operation_name: &str,
        kind: OperationKind,
        field: &FieldDescriptor,
        args: &[Argument],
    ) -> Result<GraphqlRequest, ExceptionalError> {
        if !is_compatible(&field.ty, result) {
            return Err(ExceptionalError::ResultTypeMismatch {
                host: result.name(),
                expected: field.ty.named_type().to_string(),
            });
        }
        if !result.is_representable() {
            return Err(ExceptionalError::ResultNotRepresentable(result.name()));
        }

        let extra = args
            .iter()
            .skip(field.arguments.len())
            .filter(|arg| arg.is_present())
            .count();
        if extra > 0 {
            return Err(ExceptionalError::TooManyArguments {
                field: field.name.clone(),
                declared: field.arguments.len(),
                supplied: args.iter().filter(|arg| arg.is_present()).count(),
            });
        }

        let mut bindings = Vec::new();
        let mut definitions = Vec::new();
        let mut variables = Map::new();

        for (idx, declared) in field.arguments.iter().enumerate() {
            let arg = args.get(idx).unwrap_or(&Argument::Absent);
            let (host_type, value) = match arg {
                _ if !arg.is_present() && declared.ty.is_non_null() => {
                    return Err(ExceptionalError::ArgumentRequired(declared.name.clone()));
                }
                Argument::Present { host_type, value } if arg.is_present() => (host_type, value),
                _ => continue,
            };

            if !is_compatible(&declared.ty, host_type) {
                return Err(ExceptionalError::ArgumentTypeMismatch {
                    argument: declared.name.clone(),
                    host: host_type.name(),
                    expected: declared.ty.named_type().to_string(),
                });
            }
            if !host_type.is_representable() {
                return Err(ExceptionalError::ArgumentNotRepresentable {
                    argument: declared.name.clone(),
                    host: host_type.name(),
                });
            }
            let value = value
                .as_ref()
                .map_err(|message| ExceptionalError::MalformedArgument {
                    argument: declared.name.clone(),
                    message: message.clone(),
                })?;

            bindings.push(ArgumentBinding {
                name: declared.name.clone(),
                variable: declared.name.clone(),
            });
            definitions.push(VariableDefinition {
                name: declared.name.clone(),
                ty: declared.ty.clone(),
            });
            variables.insert(declared.name.clone(), value.clone());
        }

        let root = FieldSelection {
            name: name.to_string(),
            arguments: bindings,
            selection: synthesize(result, self.selection_depth),
        };

        let query = render_operation(kind, operation_name, &definitions, &root);
        debug!(
            operation = operation_name,
            kind = %kind,
            variables = variables.len(),
            "built GraphQL request"
        );

        Ok(GraphqlRequest {
            query: GraphqlQuery::new(query),
            operation_name: operation_name.to_string(),
            variables,
        })
    }
}

/// `kind name($a: T, …) { field }`; the parenthesised clause is omitted when
/// there are no variables.
#[must_use]
pub fn render_operation(
    kind: OperationKind,
    operation_name: &str,
    definitions: &[VariableDefinition],
    root: &FieldSelection,
) -> String {
    let header = if definitions.is_empty() {
        String::new()
    } else {
        let rendered: Vec<String> = definitions.iter().map(ToString::to_string).collect();
        format!("({})", rendered.join(", "))
    };
    format!("{kind} {operation_name}{header} {{ {root} }}")
}
