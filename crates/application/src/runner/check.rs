//! Expectation evaluation.
//!
//! Executes expectations against a response and produces check results.

use restcase_domain::{CheckResult, Expectation, ResponseSpec};
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

/// Evaluates every expectation against one response, in order.
///
/// The body is parsed at most once. No expectation short-circuits the
/// others, so a report always lists every check.
#[must_use]
pub fn evaluate(expectations: &[Expectation], response: &ResponseSpec) -> Vec<CheckResult> {
    let body = if expectations.iter().any(Expectation::needs_json) {
        Some(response.json().map_err(|e| e.to_string()))
    } else {
        None
    };

    expectations
        .iter()
        .map(|expectation| match (expectation, &body) {
            (Expectation::StatusCode { expected }, _) => {
                check_status_code(expectation, response, *expected)
            }
            (_, Some(Err(err))) => CheckResult::fail_with_value(
                expectation.clone(),
                response.body_preview(PREVIEW_CHARS),
                format!("Failed to parse body as JSON: {err}"),
            ),
            (Expectation::FieldEquals { field, expected }, Some(Ok(json))) => {
                check_field_equals(expectation, json, field, expected)
            }
            (Expectation::FieldPresent { field }, Some(Ok(json))) => {
                check_field_present(expectation, json, field)
            }
            (Expectation::NonEmptyList, Some(Ok(json))) => check_non_empty_list(expectation, json),
            (_, None) => CheckResult::fail(expectation.clone(), "No body was parsed"),
        })
        .collect()
}

fn check_status_code(expectation: &Expectation, response: &ResponseSpec, expected: u16) -> CheckResult {
    let actual = response.status;
    if actual == expected {
        CheckResult::pass_with_value(expectation.clone(), actual.to_string())
    } else {
        CheckResult::fail_with_value(
            expectation.clone(),
            actual.to_string(),
            format!("Expected status {expected}, got {actual}"),
        )
    }
}

fn check_field_equals(
    expectation: &Expectation,
    json: &Value,
    field: &str,
    expected: &Value,
) -> CheckResult {
    match json.get(field) {
        Some(actual) if values_match(expected, actual) => {
            CheckResult::pass_with_value(expectation.clone(), actual.to_string())
        }
        Some(actual) => CheckResult::fail_with_value(
            expectation.clone(),
            actual.to_string(),
            format!("Field '{field}' value mismatch: expected {expected}, got {actual}"),
        ),
        None => CheckResult::fail(expectation.clone(), format!("Field '{field}' not found")),
    }
}

/// JSON equality where numbers compare by value, so `1` matches `1.0`.
fn values_match(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => {
            e == a || ((e.is_f64() || a.is_f64()) && e.as_f64() == a.as_f64())
        }
        (Value::Array(e), Value::Array(a)) => {
            e.len() == a.len() && e.iter().zip(a).all(|(e, a)| values_match(e, a))
        }
        (Value::Object(e), Value::Object(a)) => {
            e.len() == a.len()
                && e.iter()
                    .all(|(key, e)| a.get(key).is_some_and(|a| values_match(e, a)))
        }
        _ => expected == actual,
    }
}

fn check_field_present(expectation: &Expectation, json: &Value, field: &str) -> CheckResult {
    match json.get(field) {
        Some(actual) => CheckResult::pass_with_value(expectation.clone(), actual.to_string()),
        None => CheckResult::fail(expectation.clone(), format!("Field '{field}' not found")),
    }
}

fn check_non_empty_list(expectation: &Expectation, json: &Value) -> CheckResult {
    match json.as_array() {
        Some(items) if !items.is_empty() => {
            CheckResult::pass_with_value(expectation.clone(), format!("{} items", items.len()))
        }
        Some(_) => CheckResult::fail_with_value(expectation.clone(), "[]", "List is empty"),
        None => CheckResult::fail(expectation.clone(), "Body is not a JSON array"),
    }
}
