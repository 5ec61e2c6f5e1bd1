mod common;

use serde_json::json;
use typed_graphql::{
    GraphqlQuery, GraphqlRequest, GraphqlResponse, JSON_DECODE_FAILURE, NULL_FOR_NON_NULL, decode,
};

use common::{TestContext, TestResult};

fn request() -> GraphqlRequest {
    GraphqlRequest::new(
        GraphqlQuery::new("query aTestQuery { aTestQuery { anInt edge { anInt } } }"),
        "aTestQuery",
    )
}

#[test]
fn null_for_non_null_field_reports_snapshot() {
    let mut ctx = TestContext::new("null_for_non_null_field_reports_snapshot", "decode");
    let body = r#"{"Data":{"aTestQuery":null},"Errors":[]}"#;
    let response: GraphqlResponse = serde_json::from_str(body).expect("response");

    let err = decode::<TestResult>(&response, &request(), "aTestQuery", true).expect_err("null");

    ctx.assert_eq(err.message.as_str(), NULL_FOR_NON_NULL, "message");
    ctx.assert_eq(
        err.response.clone(),
        Some(serde_json::to_string_pretty(&response).expect("pretty")),
        "snapshot",
    );
    ctx.assert_eq(err.request.clone(), Some(request()), "request attached");
    ctx.finalize("pass", None);
}

#[test]
fn null_for_nullable_field_is_none() {
    let mut ctx = TestContext::new("null_for_nullable_field_is_none", "decode");
    let response: GraphqlResponse =
        serde_json::from_value(json!({"data": {"aTestQuery": null}})).expect("response");

    let decoded: Option<TestResult> =
        decode(&response, &request(), "aTestQuery", false).expect("nullable");

    ctx.assert_eq(decoded, None, "decoded value");
    ctx.finalize("pass", None);
}

#[test]
fn null_for_nullable_field_needs_an_option() {
    let mut ctx = TestContext::new("null_for_nullable_field_needs_an_option", "decode");
    let response: GraphqlResponse =
        serde_json::from_value(json!({"data": {"aTestQuery": null}})).expect("parse");

    let err = decode::<TestResult>(&response, &request(), "aTestQuery", false)
        .expect_err("plain struct cannot hold null");
    ctx.assert_eq(err.message.as_str(), JSON_DECODE_FAILURE, "message");
    ctx.assert_true(
        err.cause.as_deref().is_some_and(|cause| cause.contains("null")),
        "cause names the null",
    );
    ctx.finalize("pass", None);
}

#[test]
fn missing_data_behaves_like_null() {
    let mut ctx = TestContext::new("missing_data_behaves_like_null", "decode");
    let response: GraphqlResponse = serde_json::from_value(json!({"data": null})).expect("response");

    let required = decode::<TestResult>(&response, &request(), "aTestQuery", true);
    ctx.assert_true(required.is_err(), "required field fails");

    let optional: Option<TestResult> =
        decode(&response, &request(), "aTestQuery", false).expect("optional");
    ctx.assert_true(optional.is_none(), "optional field is none");
    ctx.finalize("pass", None);
}

#[test]
fn extra_server_field_is_a_decode_error() {
    let mut ctx = TestContext::new("extra_server_field_is_a_decode_error", "decode");
    let response: GraphqlResponse = serde_json::from_value(json!({
        "data": {"aTestQuery": {"anInt": 1, "edge": null, "addedLater": true}}
    }))
    .expect("response");

    let err = decode::<TestResult>(&response, &request(), "aTestQuery", true).expect_err("strict");

    ctx.assert_eq(err.message.as_str(), JSON_DECODE_FAILURE, "message");
    ctx.assert_eq(
        err.cause.as_deref(),
        Some("unknown field `addedLater` in TestResult"),
        "cause",
    );
    ctx.assert_eq(err.response.clone(), Some(response.pretty()), "snapshot");
    ctx.finalize("pass", None);
}

#[test]
fn declared_shape_decodes() {
    let mut ctx = TestContext::new("declared_shape_decodes", "decode");
    let response: GraphqlResponse = serde_json::from_value(json!({
        "data": {"aTestQuery": {
            "anInt": 1,
            "edge": {"anInt": 2, "aFloat": 0.5, "aDouble": 0.25, "theTime": "2024-05-01T00:00:00Z"}
        }}
    }))
    .expect("response");

    let decoded: TestResult = decode(&response, &request(), "aTestQuery", true).expect("decode");

    ctx.assert_eq(decoded.an_int, 1, "anInt");
    ctx.assert_eq(decoded.edge.map(|edge| edge.an_int), Some(2), "edge");
    ctx.finalize("pass", None);
}
