#![allow(dead_code)]

use std::time::Instant;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use typed_graphql::{GraphqlType, HostType, ModelDescriptor, NamingStrategy};
use typed_graphql_testkit::LogCapture;

pub const TEST_NAMESPACE: &str = "typed_graphql::tests";

/// Operations the test client is configured with.
pub const CLIENT_SCHEMA: &str = r"
type Query {
    aTestQuery(arg1: ID!, arg2: String, arg3: TestType!): TestResult!
    anotherQuery(arg1: ID!, arg2: String, arg3: TestType!): TestType!
    nullableQuery(arg1: ID): TestResult
    listQuery(ids: [ID!]!): [TestType!]!
    colorQuery(color: Color!): Color!
}

type Mutation {
    aTestMutation(arg1: ID!, arg2: String, arg3: TestInputType!): TestResult!
}
";

/// Full reference schema the client is validated against.
pub const REFERENCE_SCHEMA: &str = r"
scalar DateTime

enum Color { RED GREEN }

type TestType {
    anInt: Int
    aFloat: Float
    aDouble: Float
    theTime: DateTime
}

input TestInputType {
    anInt: Int
}

type TestResult {
    anInt: Int
    edge: TestType
}

type NotGraphqlModel {
    anInt: Int
}

type Mystery {
    anInt: Int
}

type Query {
    aTestQuery(arg1: ID!, arg2: String, arg3: TestType!): TestResult!
    anotherQuery(arg1: ID!, arg2: String, arg3: TestType!): TestType!
    yetAnotherQuery(arg1: ID!, arg2: String, arg3: TestType!): TestType!
    nullableQuery(arg1: ID): TestResult
    listQuery(ids: [ID!]!): [TestType!]!
    colorQuery(color: Color!): Color!
    modelNotOkQuery: NotGraphqlModel!
    argNotModelQuery(arg1: ID!, arg2: NotGraphqlModel, arg3: TestType!): TestType!
    mysteryQuery: Mystery
}

type Mutation {
    aTestMutation(arg1: ID!, arg2: String, arg3: TestInputType!): TestResult!
    anotherMutation(arg1: ID!, arg2: String, arg3: TestInputType!): TestResult!
}
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestType {
    pub an_int: i32,
    pub a_float: f32,
    pub a_double: f64,
    pub the_time: DateTime<Utc>,
}

impl GraphqlType for TestType {
    fn host_type() -> HostType {
        HostType::model("TestType", || {
            ModelDescriptor::new("TestType")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<i32>("an_int")
                .field::<f32>("a_float")
                .field::<f64>("a_double")
                .field::<DateTime<Utc>>("the_time")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub an_int: i32,
    pub edge: Option<TestType>,
}

impl GraphqlType for TestResult {
    fn host_type() -> HostType {
        HostType::model("TestResult", || {
            ModelDescriptor::new("TestResult")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<i32>("an_int")
                .field::<TestType>("edge")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestInputType {
    pub an_int: i32,
}

impl GraphqlType for TestInputType {
    fn host_type() -> HostType {
        HostType::model("TestInputType", || {
            ModelDescriptor::new("TestInputType")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<i32>("an_int")
        })
    }
}

/// Declared to the client but not representable in GraphQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotGraphqlModel {
    pub an_int: i32,
}

impl GraphqlType for NotGraphqlModel {
    fn host_type() -> HostType {
        HostType::Opaque("NotGraphqlModel")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Red,
    Green,
}

impl GraphqlType for Color {
    fn host_type() -> HostType {
        HostType::Enum("Color")
    }
}

pub fn test_type() -> TestType {
    TestType {
        an_int: 7,
        a_float: 1.5,
        a_double: 2.25,
        the_time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("valid time"),
    }
}

pub struct TestContext {
    test_name: String,
    module: String,
    correlation_id: String,
    capture: LogCapture,
    start_time: Instant,
    assertions_passed: u32,
    assertions_failed: u32,
}

impl TestContext {
    pub fn new(test_name: &str, module: &str) -> Self {
        typed_graphql_testkit::init_test_tracing();
        Self {
            test_name: test_name.to_string(),
            module: format!("typed-graphql::{module}"),
            correlation_id: format!("graphql-{}", std::process::id()),
            capture: LogCapture::new(),
            start_time: Instant::now(),
            assertions_passed: 0,
            assertions_failed: 0,
        }
    }

    pub fn assert_true(&mut self, condition: bool, msg: &str) {
        if condition {
            self.assertions_passed += 1;
        } else {
            self.assertions_failed += 1;
            panic!("{}", msg);
        }
    }

    pub fn assert_eq<T: std::fmt::Debug + PartialEq>(&mut self, actual: T, expected: T, msg: &str) {
        if actual == expected {
            self.assertions_passed += 1;
        } else {
            self.assertions_failed += 1;
            panic!("{msg}: expected {expected:?}, got {actual:?}");
        }
    }

    pub fn finalize(&self, result: &str, details: Option<serde_json::Value>) {
        let duration_ms = u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": "info",
            "test_name": self.test_name,
            "module": self.module,
            "phase": "verify",
            "correlation_id": self.correlation_id,
            "result": result,
            "duration_ms": duration_ms,
            "assertions": {
                "passed": self.assertions_passed,
                "failed": self.assertions_failed
            }
        });

        if let Some(extra) = details {
            entry["details"] = extra;
        }

        self.capture
            .push_value(&entry)
            .expect("structured test log entry");
        self.capture.assert_valid();
    }
}
