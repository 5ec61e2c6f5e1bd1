//! Host/GraphQL type compatibility.

use crate::host::{HostType, ScalarKind};
use crate::types::TypeDescriptor;

/// Decide whether values of `host` can represent `ty`.
///
/// Non-null wrappers are looked through. Lists need a host sequence whose
/// element is compatible. Named types match scalars by canonical name (`ID`
/// also accepts host strings) and everything else by declared name.
#[must_use]
pub fn is_compatible(ty: &TypeDescriptor, host: &HostType) -> bool {
    match (ty, host) {
        (TypeDescriptor::NonNull(inner), _) => is_compatible(inner, host),
        (TypeDescriptor::List(inner), HostType::List(element)) => is_compatible(inner, element),
        (TypeDescriptor::List(_), _) | (TypeDescriptor::Named(_), HostType::List(_)) => false,
        (TypeDescriptor::Named(name), HostType::Scalar(kind)) => {
            kind.graphql_name() == name.as_str() || (name == "ID" && *kind == ScalarKind::String)
        }
        (TypeDescriptor::Named(name), HostType::Model(model)) => model.name() == name.as_str(),
        (TypeDescriptor::Named(name), HostType::Enum(host_name) | HostType::Opaque(host_name)) => {
            *host_name == name.as_str()
        }
    }
}
