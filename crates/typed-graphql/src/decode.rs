//! Typed decoding of a GraphQL response.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::{ClientError, JSON_DECODE_FAILURE, NULL_FOR_NON_NULL};
use crate::host::{GraphqlType, HostType};
use crate::operation::{GraphqlRequest, GraphqlResponse};

/// Decode `response.data[name]` into `T`.
///
/// A missing or `null` entry fails when `required_non_null` is set and
/// otherwise decodes `T` from `null`, so nullable results are requested as
/// `Option<_>`. Payload keys that `T` does not declare are decode errors.
/// `response.errors` is never looked at.
pub fn decode<T>(
    response: &GraphqlResponse,
    request: &GraphqlRequest,
    name: &str,
    required_non_null: bool,
) -> Result<T, ClientError>
where
    T: DeserializeOwned + GraphqlType,
{
    let Some(data) = response.field(name) else {
        if required_non_null {
            warn!(operation = %request.operation_name, field = name, "null returned for non-null field");
            return Err(ClientError::new(NULL_FOR_NON_NULL)
                .with_request(request)
                .with_response(response.pretty()));
        }
        return serde_json::from_value(Value::Null).map_err(|err| shape_mismatch(err, response, request));
    };

    check_shape(&T::host_type(), data).map_err(|err| shape_mismatch(err, response, request))?;
    serde_json::from_value(data.clone()).map_err(|err| shape_mismatch(err, response, request))
}

fn shape_mismatch(
    cause: impl ToString,
    response: &GraphqlResponse,
    request: &GraphqlRequest,
) -> ClientError {
    let cause = cause.to_string();
    warn!(operation = %request.operation_name, cause = %cause, "response shape mismatch");
    ClientError::new(JSON_DECODE_FAILURE)
        .with_cause(cause)
        .with_request(request)
        .with_response(response.pretty())
}

/// Reject object keys the host model does not declare, recursively.
pub fn check_shape(host: &HostType, value: &Value) -> Result<(), String> {
    match (host, value) {
        (HostType::List(element), Value::Array(items)) => {
            items.iter().try_for_each(|item| check_shape(element, item))
        }
        (HostType::Model(model), Value::Object(map)) => {
            let descriptor = model.descriptor();
            for (key, nested) in map {
                let Some(field) = descriptor.field_by_mapped_name(key) else {
                    return Err(format!("unknown field `{key}` in {}", descriptor.name));
                };
                check_shape(&field.ty, nested)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
