//! Query parameter types

use serde::{Deserialize, Serialize};

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered query parameters forwarded by read requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a query parameter to the collection.
    pub fn add(&mut self, param: QueryParam) {
        self.items.push(param);
    }

    /// Adds a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.push(QueryParam::new(key, value));
        self
    }

    /// Returns an iterator over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryParam> {
        self.items.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_creation() {
        let param = QueryParam::new("userId", "1");
        assert_eq!(param.key, "userId");
        assert_eq!(param.value, "1");
    }

    #[test]
    fn test_query_params_keep_order() {
        let params = QueryParams::new().with("userId", "1").with("_limit", "5");

        let keys: Vec<_> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["userId", "_limit"]);
        assert_eq!(params.len(), 2);
    }
}
