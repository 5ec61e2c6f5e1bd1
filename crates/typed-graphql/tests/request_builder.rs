mod common;

use serde_json::json;
use typed_graphql::{Argument, ExceptionalError, GraphqlClient, GraphqlClientBuilder, GraphqlClientError};

use common::{CLIENT_SCHEMA, Color, TestContext, TestInputType, TestResult, TestType, test_type};

fn client() -> GraphqlClient {
    GraphqlClientBuilder::new("http://127.0.0.1:9/graphql")
        .with_schema(CLIENT_SCHEMA)
        .build()
        .expect("client")
}

#[test]
fn nullable_absent_argument_is_omitted() {
    let mut ctx = TestContext::new("nullable_absent_argument_is_omitted", "request");
    let request = client()
        .prepare::<TestResult>(
            "aTestQuery",
            "",
            &[Argument::new("ID-123"), Argument::absent(), Argument::new(&test_type())],
        )
        .expect("request");

    ctx.assert_eq(
        request.query.as_str(),
        "query aTestQuery($arg1: ID!, $arg3: TestType!) { aTestQuery(arg1: $arg1, arg3: $arg3) { anInt edge { anInt aFloat aDouble theTime } } }",
        "query text",
    );
    ctx.assert_eq(request.variables.len(), 2, "variable count");
    ctx.assert_eq(
        serde_json::Value::Object(request.variables.clone()),
        json!({
            "arg1": "ID-123",
            "arg3": {"anInt": 7, "aFloat": 1.5, "aDouble": 2.25, "theTime": "2024-01-02T03:04:05Z"}
        }),
        "variables",
    );
    ctx.assert_eq(
        serde_json::to_value(&request).expect("serialize")["operationName"].clone(),
        json!("aTestQuery"),
        "operation name on the wire",
    );
    ctx.finalize("pass", None);
}

#[test]
fn absent_required_argument_is_exceptional() {
    let mut ctx = TestContext::new("absent_required_argument_is_exceptional", "request");
    let err = client()
        .prepare::<TestResult>(
            "aTestQuery",
            "",
            &[Argument::absent(), Argument::new("x"), Argument::new(&test_type())],
        )
        .expect_err("arg1 is required");

    ctx.assert_true(err.is_exceptional(), "exceptional failure");
    ctx.assert_eq(
        err.to_string(),
        "Argument is null, but GraphQL is requiring arg1 to be non-null.".to_string(),
        "message names the argument",
    );
    ctx.finalize("pass", None);
}

#[test]
fn none_values_are_treated_as_absent() {
    let mut ctx = TestContext::new("none_values_are_treated_as_absent", "request");
    let no_id: Option<String> = None;
    let no_text: Option<String> = None;

    let request = client()
        .prepare::<TestResult>(
            "aTestQuery",
            "",
            &[Argument::new("ID-123"), Argument::new(&no_text), Argument::new(&test_type())],
        )
        .expect("request");
    ctx.assert_eq(
        request.query.as_str(),
        "query aTestQuery($arg1: ID!, $arg3: TestType!) { aTestQuery(arg1: $arg1, arg3: $arg3) { anInt edge { anInt aFloat aDouble theTime } } }",
        "nullable None omitted",
    );
    ctx.assert_true(!request.variables.contains_key("arg2"), "no null variable");

    let err = client()
        .prepare::<TestResult>(
            "aTestQuery",
            "",
            &[Argument::new(&no_id), Argument::new("x"), Argument::new(&test_type())],
        )
        .expect_err("arg1 is required");
    ctx.assert_eq(
        err.to_string(),
        "Argument is null, but GraphQL is requiring arg1 to be non-null.".to_string(),
        "non-null None rejected",
    );
    ctx.finalize("pass", None);
}

#[test]
fn mismatched_argument_type_is_exceptional() {
    let mut ctx = TestContext::new("mismatched_argument_type_is_exceptional", "request");
    let err = client()
        .prepare::<TestResult>(
            "aTestQuery",
            "",
            &[Argument::new(&42), Argument::absent(), Argument::new(&test_type())],
        )
        .expect_err("Int is not an ID");

    ctx.assert_true(
        matches!(
            err,
            GraphqlClientError::Exceptional(ExceptionalError::ArgumentTypeMismatch { ref argument, .. })
                if argument == "arg1"
        ),
        "argument mismatch on arg1",
    );
    ctx.finalize("pass", None);
}

#[test]
fn mismatched_result_type_is_exceptional() {
    let mut ctx = TestContext::new("mismatched_result_type_is_exceptional", "request");
    let err = client()
        .prepare::<TestType>("aTestQuery", "", &[Argument::new("ID-1")])
        .expect_err("TestType is not TestResult");

    ctx.assert_eq(
        err.to_string(),
        "Result type TestType doesn't match GraphQL result type TestResult".to_string(),
        "result mismatch message",
    );
    ctx.finalize("pass", None);
}

#[test]
fn too_many_present_arguments_fail() {
    let mut ctx = TestContext::new("too_many_present_arguments_fail", "request");
    let client = client();
    let err = client
        .prepare::<Option<TestResult>>("nullableQuery", "", &[Argument::new("a"), Argument::new("b")])
        .expect_err("one declared argument");
    ctx.assert_true(
        matches!(err, GraphqlClientError::Exceptional(ExceptionalError::TooManyArguments { .. })),
        "arity failure",
    );

    let request = client
        .prepare::<Option<TestResult>>("nullableQuery", "", &[Argument::absent(), Argument::absent()])
        .expect("absent extras are ignored");
    ctx.assert_eq(
        request.query.as_str(),
        "query nullableQuery { nullableQuery { anInt edge { anInt aFloat aDouble theTime } } }",
        "no variable header",
    );
    ctx.finalize("pass", None);
}

#[test]
fn list_arguments_and_results() {
    let mut ctx = TestContext::new("list_arguments_and_results", "request");
    let ids = vec!["a".to_string(), "b".to_string()];
    let request = client()
        .prepare::<Vec<TestType>>("listQuery", "Lists", &[Argument::new(&ids)])
        .expect("request");

    ctx.assert_eq(
        request.query.as_str(),
        "query Lists($ids: [ID!]!) { listQuery(ids: $ids) { anInt aFloat aDouble theTime } }",
        "query text",
    );
    ctx.assert_eq(request.variables["ids"].clone(), json!(["a", "b"]), "ids");

    let err = client()
        .prepare::<Vec<TestType>>("listQuery", "", &[Argument::new("a")])
        .expect_err("scalar for list");
    ctx.assert_true(err.is_exceptional(), "scalar is not a list");
    ctx.finalize("pass", None);
}

#[test]
fn enums_are_leaves() {
    let mut ctx = TestContext::new("enums_are_leaves", "request");
    let request = client()
        .prepare::<Color>("colorQuery", "", &[Argument::new(&Color::Red)])
        .expect("request");
    ctx.assert_eq(
        request.query.as_str(),
        "query colorQuery($color: Color!) { colorQuery(color: $color) }",
        "query text",
    );
    ctx.assert_eq(request.variables["color"].clone(), json!("RED"), "enum value");
    ctx.finalize("pass", None);
}

#[test]
fn mutation_with_explicit_operation_name() {
    let mut ctx = TestContext::new("mutation_with_explicit_operation_name", "request");
    let request = client()
        .prepare::<TestResult>(
            "aTestMutation",
            "AddThing",
            &[Argument::new("ID-9"), Argument::absent(), Argument::new(&TestInputType { an_int: 3 })],
        )
        .expect("request");
    ctx.assert_eq(
        request.query.as_str(),
        "mutation AddThing($arg1: ID!, $arg3: TestInputType!) { aTestMutation(arg1: $arg1, arg3: $arg3) { anInt edge { anInt aFloat aDouble theTime } } }",
        "query text",
    );
    ctx.assert_eq(request.operation_name.as_str(), "AddThing", "operation name");
    ctx.finalize("pass", None);
}

#[test]
fn depth_override_limits_selection() {
    let mut ctx = TestContext::new("depth_override_limits_selection", "request");
    let client = GraphqlClientBuilder::new("http://127.0.0.1:9/graphql")
        .with_schema(CLIENT_SCHEMA)
        .with_depth_override("TestResult", 1)
        .build()
        .expect("client");
    let request = client
        .prepare::<Option<TestResult>>("nullableQuery", "", &[])
        .expect("request");
    ctx.assert_eq(
        request.query.as_str(),
        "query nullableQuery { nullableQuery { anInt edge } }",
        "edge selected without expansion",
    );
    ctx.finalize("pass", None);
}
