//! Fixed scenarios of the posts suite: hardcoded inputs, no case data.

use restcase_domain::{Expectation, InstanceId};
use serde_json::json;

use super::TestInstance;
use super::binding::ResourceCall;

/// Title sent by `update_post` and expected back.
pub const UPDATED_TITLE: &str = "updated title";

/// `list_posts`: the collection is a non-empty array.
#[must_use]
pub fn list_posts() -> TestInstance {
    TestInstance {
        id: InstanceId::fixed("list_posts"),
        call: ResourceCall::List,
        expectations: vec![Expectation::status(200), Expectation::NonEmptyList],
    }
}

/// `update_post`: replacing post 1 echoes the new title.
#[must_use]
pub fn update_post() -> TestInstance {
    TestInstance {
        id: InstanceId::fixed("update_post"),
        call: ResourceCall::Update {
            id: "1".to_string(),
            payload: json!({
                "title": UPDATED_TITLE,
                "body": "updated body",
                "userId": 1
            }),
        },
        expectations: vec![
            Expectation::status(200),
            Expectation::field_equals("title", json!(UPDATED_TITLE)),
        ],
    }
}

/// `delete_post`: deleting post 1 answers 200.
#[must_use]
pub fn delete_post() -> TestInstance {
    TestInstance {
        id: InstanceId::fixed("delete_post"),
        call: ResourceCall::Delete {
            id: "1".to_string(),
        },
        expectations: vec![Expectation::status(200)],
    }
}

/// Every fixed scenario of the posts suite.
#[must_use]
pub fn post_scenarios() -> Vec<TestInstance> {
    vec![list_posts(), update_post(), delete_post()]
}
