//! Data-driven test case definitions.
//!
//! A case file is a mapping from group name to an ordered list of case
//! records:
//!
//! ```yaml
//! get_post_cases:
//!   - name: get post 1
//!     post_id: 1
//!     expected_status: 200
//!     expected_userId: 1
//! ```
//!
//! Every record needs a `name` and an `expected_status`. All other keys are
//! kept verbatim; keys prefixed with `expected_` declare body fields to
//! compare, the rest are operation inputs.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Prefix marking a record key as an expected response body field.
pub const EXPECTED_PREFIX: &str = "expected_";

/// One scenario: operation input plus expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Identifier of the test instance built from this case.
    pub name: String,
    /// Exact status code the response must carry.
    pub expected_status: u16,
    /// Operation inputs and `expected_*` field values.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl TestCase {
    /// Creates a case with no inputs or field expectations.
    #[must_use]
    pub fn new(name: impl Into<String>, expected_status: u16) -> Self {
        Self {
            name: name.into(),
            expected_status,
            fields: BTreeMap::new(),
        }
    }

    /// Adds a raw record field (builder pattern).
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Adds an expected body field, stored as `expected_<field>`.
    #[must_use]
    pub fn expecting(self, field: &str, value: Value) -> Self {
        self.with_field(format!("{EXPECTED_PREFIX}{field}"), value)
    }

    /// Returns an operation input by key.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the expected value for a body field.
    #[must_use]
    pub fn expected_field(&self, field: &str) -> Option<&Value> {
        self.fields.get(&format!("{EXPECTED_PREFIX}{field}"))
    }

    /// Iterates over declared body expectations as `(field, value)`.
    pub fn expected_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter_map(|(key, value)| key.strip_prefix(EXPECTED_PREFIX).map(|f| (f, value)))
    }
}

/// Named, ordered collection of cases sharing one scenario shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseGroup {
    /// Group key in the case file.
    pub name: String,
    /// Cases in declaration order.
    pub cases: Vec<TestCase>,
}

impl CaseGroup {
    /// Creates a group.
    #[must_use]
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            name: name.into(),
            cases,
        }
    }

    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if the group has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns the case names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|c| c.name.as_str())
    }

    /// Checks the structural rules every group must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violation: blank or duplicate case name, or a
    /// status code outside `100..=599`. An empty group is valid.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = HashSet::new();
        for (index, case) in self.cases.iter().enumerate() {
            if case.name.trim().is_empty() {
                return Err(DomainError::invalid_case(
                    &self.name,
                    format!("#{}", index + 1),
                    "name must not be empty",
                ));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(DomainError::DuplicateCase {
                    group: self.name.clone(),
                    case: case.name.clone(),
                });
            }
            if !(100..=599).contains(&case.expected_status) {
                return Err(DomainError::invalid_case(
                    &self.name,
                    &case.name,
                    format!("expected_status {} is not an HTTP status", case.expected_status),
                ));
            }
        }
        Ok(())
    }
}

/// Every case group of one definition file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseBook {
    groups: Vec<CaseGroup>,
}

impl CaseBook {
    /// Creates a book from groups.
    #[must_use]
    pub const fn new(groups: Vec<CaseGroup>) -> Self {
        Self { groups }
    }

    /// Returns a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&CaseGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Returns all groups in file order.
    #[must_use]
    pub fn groups(&self) -> &[CaseGroup] {
        &self.groups
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the book has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of cases across all groups.
    #[must_use]
    pub fn total_cases(&self) -> usize {
        self.groups.iter().map(CaseGroup::len).sum()
    }

    /// Validates every group.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, see [`CaseGroup::validate`].
    pub fn validate(&self) -> DomainResult<()> {
        self.groups.iter().try_for_each(CaseGroup::validate)
    }
}

impl Serialize for CaseBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.name, &group.cases)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CaseBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BookVisitor;

        impl<'de> Visitor<'de> for BookVisitor {
            type Value = CaseBook;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of case group names to lists of cases")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CaseBook, A::Error> {
                let mut groups: Vec<CaseGroup> = Vec::new();
                while let Some((name, cases)) = map.next_entry::<String, Vec<TestCase>>()? {
                    if groups.iter().any(|g| g.name == name) {
                        return Err(de::Error::custom(format!("duplicate case group '{name}'")));
                    }
                    groups.push(CaseGroup::new(name, cases));
                }
                Ok(CaseBook::new(groups))
            }
        }

        deserializer.deserialize_map(BookVisitor)
    }
}
