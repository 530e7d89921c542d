//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It performs every network call of the harness.

use std::collections::HashMap;
use std::error::Error as _;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use restcase_application::ports::{HttpClient, HttpClientError};
use restcase_domain::{HttpMethod, RequestBody, RequestSpec, ResponseSpec};

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps one `reqwest::Client`, so connections are pooled across every
/// request of a run.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "restcase/<version>"
    ///
    /// Timeouts are per request, taken from the [`RequestSpec`].
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("restcase/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Parses the URL and appends the query parameters.
    fn build_url(request: &RequestSpec) -> Result<Url, HttpClientError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in request.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }

    /// Builds the request body from domain `RequestBody`.
    fn build_body(builder: RequestBuilder, body: &RequestBody) -> Result<RequestBuilder, HttpClientError> {
        match body {
            RequestBody::None => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Form(pairs) => {
                let encoded = serde_urlencoded::to_string(pairs)
                    .map_err(|e| HttpClientError::InvalidBody(format!("Invalid form data: {e}")))?;
                Ok(builder.body(encoded))
            }
            RequestBody::Raw { content, .. } => Ok(builder.body(content.clone())),
        }
    }

    /// Maps reqwest errors to domain `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error_chain(error);
            let lower = message.to_lowercase();
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                let port = error
                    .url()
                    .and_then(Url::port_or_known_default)
                    .unwrap_or(80);
                return HttpClientError::ConnectionRefused { host, port };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error_chain(error))
    }
}

/// Joins an error with all of its sources; reqwest keeps the useful part
/// (e.g. "Connection refused") in the source chain.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        let url = Self::build_url(request)?;
        let timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);

        // Start timing
        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);

        for header in request.headers.iter() {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        // Add Content-Type if body has one and not already set
        if let Some(content_type) = request.body.content_type()
            && request.headers.get("content-type").is_none()
        {
            builder = builder.header("Content-Type", content_type);
        }

        builder = Self::build_body(builder, &request.body)?;

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let response_headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?
            .to_vec();

        let duration = start.elapsed();

        Ok(ResponseSpec::new(
            status,
            response_headers,
            body_bytes,
            duration,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;
    use restcase_domain::QueryParams;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ReqwestHttpClient {
        ReqwestHttpClient::new().unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_build_url_appends_query() {
        let request = RequestSpec::get("http://svc.test/posts")
            .with_query(QueryParams::new().with("userId", "1").with("q", "a b"));

        let url = ReqwestHttpClient::build_url(&request).unwrap();

        assert_eq!(url.as_str(), "http://svc.test/posts?userId=1&q=a+b");
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let result = client().send(&RequestSpec::get("not a url")).await;
        assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_get_with_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("userId", "1"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let request = RequestSpec::get(format!("{}/posts", server.uri()))
            .with_header("Content-Type", "application/json")
            .with_query(QueryParams::new().with("userId", "1"));
        let response = client().send(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap(), json!([{"id": 1}]));
        assert!(response.header("content-type").is_some());
    }

    #[tokio::test]
    async fn test_json_body_is_sent() {
        let server = MockServer::start().await;
        let payload = json!({"title": "foo", "body": "bar", "userId": 1});
        Mock::given(method("POST"))
            .and(path("/posts"))
            .and(body_json(&payload))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 101})))
            .expect(1)
            .mount(&server)
            .await;

        let request = RequestSpec::new(HttpMethod::Post, format!("{}/posts", server.uri()))
            .with_body(RequestBody::json(payload));
        let response = client().send(&request).await.unwrap();

        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_form_body_is_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/posts/1"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string("title=a+b&userId=1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request = RequestSpec::new(HttpMethod::Put, format!("{}/posts/1", server.uri()))
            .with_body(RequestBody::form([("title", "a b"), ("userId", "1")]));
        let response = client().send(&request).await.unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let request = RequestSpec::new(HttpMethod::Delete, format!("{}/posts/1", server.uri()));
        let response = client().send(&request).await.unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(response.body, "boom");
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let request = RequestSpec::get(format!("{}/posts", server.uri()))
            .with_timeout(Duration::from_millis(100));
        let result = client().send(&request).await;

        assert_eq!(result, Err(HttpClientError::Timeout { timeout_ms: 100 }));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let request = RequestSpec::get(format!("http://127.0.0.1:{port}/posts"));
        let result = client().send(&request).await;

        assert!(
            matches!(
                result,
                Err(HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_))
            ),
            "{result:?}"
        );
    }
}
