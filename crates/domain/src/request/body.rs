//! HTTP Request body types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body attached to a write request.
///
/// `Json` is the structured flavour used by the resource clients,
/// `Form` carries URL-encoded pairs and `Raw` passes text through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// JSON-encoded structured body
    Json(Value),
    /// `application/x-www-form-urlencoded` key/value pairs
    Form(Vec<(String, String)>),
    /// Raw body with an explicit content type
    Raw {
        /// The content type (e.g., "text/plain")
        content_type: String,
        /// The body text
        content: String,
    },
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Creates a JSON body from a structured value.
    #[must_use]
    pub const fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Creates a form body from key/value pairs.
    #[must_use]
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Raw {
            content_type: "text/plain".to_string(),
            content: content.into(),
        }
    }

    /// Returns whether there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Json(_) => false,
            Self::Form(pairs) => pairs.is_empty(),
            Self::Raw { content, .. } => content.is_empty(),
        }
    }

    /// Returns the content type implied by the body.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Json(_) => Some("application/json"),
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
            Self::Raw { content_type, .. } => Some(content_type),
        }
    }
}
