//! Group bindings: which resource operation runs the cases of a group, and
//! which checks its responses must pass.

use std::fmt;

use restcase_domain::{
    CaseGroup, DomainError, DomainResult, Expectation, HttpMethod, InstanceId, ResponseSpec,
    TestCase,
};
use serde_json::Value;

use super::TestInstance;
use crate::ports::{HttpClient, HttpClientError};
use crate::resource::ResourceClient;

/// One concrete call on a resource client.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceCall {
    /// `list()`
    List,
    /// `get(id)`
    Get {
        /// Rendered identifier.
        id: String,
    },
    /// `create(payload)`
    Create {
        /// JSON payload.
        payload: Value,
    },
    /// `update(id, payload)`
    Update {
        /// Rendered identifier.
        id: String,
        /// JSON payload.
        payload: Value,
    },
    /// `delete(id)`
    Delete {
        /// Rendered identifier.
        id: String,
    },
}

impl ResourceCall {
    /// HTTP method the call maps to.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::List | Self::Get { .. } => HttpMethod::Get,
            Self::Create { .. } => HttpMethod::Post,
            Self::Update { .. } => HttpMethod::Put,
            Self::Delete { .. } => HttpMethod::Delete,
        }
    }

    /// Performs the call.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from the resource client.
    pub async fn execute<C: HttpClient>(
        &self,
        resource: &ResourceClient<C>,
    ) -> Result<ResponseSpec, HttpClientError> {
        match self {
            Self::List => resource.list().await,
            Self::Get { id } => resource.get(id).await,
            Self::Create { payload } => resource.create(payload).await,
            Self::Update { id, payload } => resource.update(id, payload).await,
            Self::Delete { id } => resource.delete(id).await,
        }
    }
}

impl fmt::Display for ResourceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("list"),
            Self::Get { id } => write!(f, "get {id}"),
            Self::Create { .. } => f.write_str("create"),
            Self::Update { id, .. } => write!(f, "update {id}"),
            Self::Delete { id } => write!(f, "delete {id}"),
        }
    }
}

/// Resource operation driven by case inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOperation {
    /// Fetch the item named by `id_field`.
    GetById {
        /// Case key holding the identifier.
        id_field: String,
    },
    /// Create an item from the mapping under `payload_field`.
    Create {
        /// Case key holding the payload.
        payload_field: String,
    },
    /// Replace an item.
    Update {
        /// Case key holding the identifier.
        id_field: String,
        /// Case key holding the payload.
        payload_field: String,
    },
    /// Delete the item named by `id_field`.
    Delete {
        /// Case key holding the identifier.
        id_field: String,
    },
}

impl CaseOperation {
    /// Case keys the operation reads.
    #[must_use]
    pub fn input_fields(&self) -> Vec<&str> {
        match self {
            Self::GetById { id_field } | Self::Delete { id_field } => vec![id_field.as_str()],
            Self::Create { payload_field } => vec![payload_field.as_str()],
            Self::Update {
                id_field,
                payload_field,
            } => vec![id_field.as_str(), payload_field.as_str()],
        }
    }

    /// Builds the call for one case.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCase`] if an input is missing or an
    /// identifier is neither a string nor a number.
    pub fn call_for(&self, group: &str, case: &TestCase) -> DomainResult<ResourceCall> {
        let id = |field: &str| -> DomainResult<String> {
            let value = require(group, case, field)?;
            render_id(value).ok_or_else(|| {
                DomainError::invalid_case(
                    group,
                    &case.name,
                    format!("'{field}' must be a string or a number, got {value}"),
                )
            })
        };
        let payload = |field: &str| require(group, case, field).cloned();

        Ok(match self {
            Self::GetById { id_field } => ResourceCall::Get { id: id(id_field)? },
            Self::Create { payload_field } => ResourceCall::Create {
                payload: payload(payload_field)?,
            },
            Self::Update {
                id_field,
                payload_field,
            } => ResourceCall::Update {
                id: id(id_field)?,
                payload: payload(payload_field)?,
            },
            Self::Delete { id_field } => ResourceCall::Delete { id: id(id_field)? },
        })
    }
}

fn require<'a>(group: &str, case: &'a TestCase, field: &str) -> DomainResult<&'a Value> {
    case.input(field).ok_or_else(|| {
        DomainError::invalid_case(group, &case.name, format!("missing input field '{field}'"))
    })
}

/// Identifiers go into the path verbatim: strings as-is, numbers in their
/// JSON form.
fn render_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Association between a case group and the operation and checks that run
/// its cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBinding {
    /// Case group name.
    pub group: String,
    /// Operation executed per case.
    pub operation: CaseOperation,
    /// `expected_<field>` entries every case must declare.
    pub required_expectations: Vec<String>,
    /// Body fields every response must contain, any value.
    pub required_fields: Vec<String>,
}

impl GroupBinding {
    /// Creates a binding with no extra requirements.
    #[must_use]
    pub fn new(group: impl Into<String>, operation: CaseOperation) -> Self {
        Self {
            group: group.into(),
            operation,
            required_expectations: Vec::new(),
            required_fields: Vec::new(),
        }
    }

    /// Requires every case to declare `expected_<field>`.
    #[must_use]
    pub fn requiring_expectation(mut self, field: impl Into<String>) -> Self {
        self.required_expectations.push(field.into());
        self
    }

    /// Requires every response to contain `field`.
    #[must_use]
    pub fn requiring_field(mut self, field: impl Into<String>) -> Self {
        self.required_fields.push(field.into());
        self
    }

    /// `get_post_cases`: GET `/posts/{post_id}`, each case declares `expected_userId`.
    #[must_use]
    pub fn get_post_cases() -> Self {
        Self::new(
            "get_post_cases",
            CaseOperation::GetById {
                id_field: "post_id".to_string(),
            },
        )
        .requiring_expectation("userId")
    }

    /// `create_post_cases`: POST `/posts` with `data`, the response carries an `id`.
    #[must_use]
    pub fn create_post_cases() -> Self {
        Self::new(
            "create_post_cases",
            CaseOperation::Create {
                payload_field: "data".to_string(),
            },
        )
        .requiring_field("id")
    }

    /// The bindings of the posts suite.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::get_post_cases(), Self::create_post_cases()]
    }

    /// Checks a group against the structural rules and this binding's
    /// requirements.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, group: &CaseGroup) -> DomainResult<()> {
        group.validate()?;
        for case in &group.cases {
            self.operation.call_for(&group.name, case)?;
            if let Some(field) = self
                .required_expectations
                .iter()
                .find(|field| case.expected_field(field).is_none())
            {
                return Err(DomainError::invalid_case(
                    &group.name,
                    &case.name,
                    format!("missing 'expected_{field}'"),
                ));
            }
        }
        Ok(())
    }

    /// Checks for one case: status first, then declared body fields, then
    /// the binding's presence checks.
    #[must_use]
    pub fn expectations_for(&self, case: &TestCase) -> Vec<Expectation> {
        std::iter::once(Expectation::status(case.expected_status))
            .chain(
                case.expected_fields()
                    .map(|(field, value)| Expectation::field_equals(field, value.clone())),
            )
            .chain(self.required_fields.iter().map(Expectation::field_present))
            .collect()
    }

    /// Builds the test instance of one case.
    ///
    /// # Errors
    ///
    /// See [`CaseOperation::call_for`].
    pub fn instance_for(&self, case: &TestCase) -> DomainResult<TestInstance> {
        Ok(TestInstance {
            id: InstanceId::case(&self.group, &case.name),
            call: self.operation.call_for(&self.group, case)?,
            expectations: self.expectations_for(case),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn get_case(name: &str, post_id: Value, user_id: i64) -> TestCase {
        TestCase::new(name, 200)
            .with_field("post_id", post_id)
            .expecting("userId", json!(user_id))
    }

    #[rstest]
    #[case::number(json!(1), "1")]
    #[case::string(json!("abc"), "abc")]
    #[case::float(json!(1.5), "1.5")]
    fn test_identifier_rendering(#[case] post_id: Value, #[case] rendered: &str) {
        let case = get_case("c", post_id, 1);
        let call = GroupBinding::get_post_cases()
            .operation
            .call_for("get_post_cases", &case)
            .unwrap();
        assert_eq!(
            call,
            ResourceCall::Get {
                id: rendered.to_string()
            }
        );
    }

    #[test]
    fn test_get_instance() {
        let binding = GroupBinding::get_post_cases();
        let instance = binding
            .instance_for(&get_case("get post 1", json!(1), 1))
            .unwrap();

        assert_eq!(instance.id, InstanceId::case("get_post_cases", "get post 1"));
        assert_eq!(instance.call.method(), HttpMethod::Get);
        assert_eq!(
            instance.expectations,
            vec![
                Expectation::status(200),
                Expectation::field_equals("userId", json!(1)),
            ]
        );
    }

    #[test]
    fn test_create_instance_requires_id() {
        let payload = json!({"title": "foo", "body": "bar", "userId": 1});
        let case = TestCase::new("create post", 201).with_field("data", payload.clone());

        let instance = GroupBinding::create_post_cases().instance_for(&case).unwrap();

        assert_eq!(instance.call, ResourceCall::Create { payload });
        assert_eq!(
            instance.expectations,
            vec![Expectation::status(201), Expectation::field_present("id")]
        );
    }

    #[test]
    fn test_validate_missing_input() {
        let group = CaseGroup::new(
            "get_post_cases",
            vec![TestCase::new("no id", 200).expecting("userId", json!(1))],
        );

        let err = GroupBinding::get_post_cases().validate(&group).unwrap_err();

        assert_eq!(
            err,
            DomainError::invalid_case("get_post_cases", "no id", "missing input field 'post_id'")
        );
    }

    #[test]
    fn test_validate_missing_required_expectation() {
        let group = CaseGroup::new(
            "get_post_cases",
            vec![TestCase::new("no user", 200).with_field("post_id", json!(1))],
        );

        let err = GroupBinding::get_post_cases().validate(&group).unwrap_err();

        assert_eq!(
            err,
            DomainError::invalid_case("get_post_cases", "no user", "missing 'expected_userId'")
        );
    }

    #[test]
    fn test_validate_rejects_structured_identifier() {
        let group = CaseGroup::new(
            "get_post_cases",
            vec![get_case("object id", json!({"id": 1}), 1)],
        );

        assert!(matches!(
            GroupBinding::get_post_cases().validate(&group),
            Err(DomainError::InvalidCase { case, .. }) if case == "object id"
        ));
    }

    #[test]
    fn test_update_and_delete_operations() {
        let case = TestCase::new("c", 200)
            .with_field("id", json!(3))
            .with_field("body", json!({"title": "x"}));
        let update = CaseOperation::Update {
            id_field: "id".to_string(),
            payload_field: "body".to_string(),
        };
        let delete = CaseOperation::Delete {
            id_field: "id".to_string(),
        };

        assert_eq!(update.input_fields(), vec!["id", "body"]);
        assert_eq!(
            update.call_for("g", &case).unwrap().to_string(),
            "update 3"
        );
        assert_eq!(
            delete.call_for("g", &case).unwrap().method(),
            HttpMethod::Delete
        );
    }
}
