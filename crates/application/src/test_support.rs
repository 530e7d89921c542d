//! Shared doubles for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use restcase_domain::{RequestSpec, ResponseSpec};

use crate::ports::{HttpClient, HttpClientError};

/// Replies with a canned result and remembers every request it saw.
pub struct RecordingClient {
    reply: Box<dyn Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl RecordingClient {
    pub fn replying(
        reply: impl Fn(&RequestSpec) -> Result<ResponseSpec, HttpClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(status: u16, body: &'static str) -> Self {
        Self::replying(move |_| Ok(json_response(status, body)))
    }

    pub fn failing(error: HttpClientError) -> Self {
        Self::replying(move |_| Err(error.clone()))
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub fn last_request(&self) -> RequestSpec {
        self.requests().pop().expect("no request recorded")
    }
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(request.clone());
        (self.reply)(request)
    }
}

pub fn json_response(status: u16, body: &str) -> ResponseSpec {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    ResponseSpec::new(
        status,
        headers,
        body.as_bytes().to_vec(),
        Duration::from_millis(5),
    )
}
