//! Response specification type
//!
//! Status, headers, body and timing of one HTTP exchange.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP response as returned by the transport.
///
/// Transient: produced by one dispatch and consumed by the checks of the
/// test instance that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body as (lossy) UTF-8 text.
    pub body: String,
    /// Time from dispatch to the last body byte.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let body = String::from_utf8(body)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());

        Self {
            status,
            headers,
            body,
            duration,
        }
    }

    /// Returns a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns the first `max` characters of the body for diagnostics.
    #[must_use]
    pub fn body_preview(&self, max: usize) -> String {
        if self.body.chars().count() > max {
            let head: String = self.body.chars().take(max).collect();
            format!("{head}...")
        } else {
            self.body.clone()
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
