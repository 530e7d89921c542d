//! HTTP Header types

use serde::{Deserialize, Serialize};

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A collection of HTTP headers.
///
/// Setting a header replaces any existing one with the same name,
/// compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing an existing one with the same name.
    pub fn set(&mut self, header: Header) {
        match self
            .items
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&header.name))
        {
            Some(existing) => existing.value = header.value,
            None => self.items.push(header),
        }
    }

    /// Returns the value of a header by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns an iterator over the headers.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header);
        }
        headers
    }
}
