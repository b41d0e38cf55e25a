//! Request descriptors, the HTTP transport seam and response classification

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use crate::core::errors::{IntentoError, Result};

/// SDK name sent in the User-Agent header
pub const SDK_NAME: &str = "intento-rust";

/// What to send: path, method, query and body
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Path below the API host, with a leading slash
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Query parameters in order; repeat a key for list values
    pub params: Vec<(String, String)>,
    /// JSON body
    pub content: Option<Value>,
    /// Pre-serialized JSON body, wins over `content`
    pub data: Option<String>,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            path: String::new(),
            method: Method::GET,
            params: Vec::new(),
            content: None,
            data: None,
        }
    }
}

impl RequestDescriptor {
    /// Descriptor for `method` and `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    /// `GET` descriptor
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` descriptor
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `DELETE` descriptor
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the query parameters
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Set the JSON body
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Set a pre-serialized JSON body
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Path with the URL-encoded query string appended
    pub fn path_with_query(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Serialized body; fails on a raw body that is not valid JSON
    pub fn body(&self) -> Result<Option<String>> {
        if let Some(data) = &self.data {
            if self.content.is_some() {
                warn!("Specify either `data` or `content` to pass data to a request, `data` will be used");
            }
            serde_json::from_str::<serde::de::IgnoredAny>(data).map_err(|e| {
                IntentoError::invalid_input(format!("`data` must be a valid JSON string: {}", e))
            })?;
            return Ok(Some(data.clone()));
        }

        match &self.content {
            Some(content) => Ok(Some(serde_json::to_string(content)?)),
            None => Ok(None),
        }
    }
}

/// Fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the query
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// Serialized body
    pub body: Option<String>,
}

/// Raw response as received from the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status
    pub status: u16,
    /// Status reason phrase, may be empty
    pub status_message: String,
    /// Raw body
    pub body: String,
}

impl TransportResponse {
    /// Response with an empty reason phrase
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_message: String::new(),
            body: body.into(),
        }
    }
}

/// Sends requests; replaceable to route calls through a custom HTTP stack
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Default transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the client, with an optional request timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| send_error(&request.url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IntentoError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_message: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn send_error(url: &str, err: reqwest::Error) -> IntentoError {
    if err.is_connect() && is_dns_failure(&err) {
        let host = err
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or(url)
            .to_string();
        return IntentoError::HostLookup {
            host,
            message: err.to_string(),
        };
    }
    if err.is_connect() || err.is_timeout() {
        return IntentoError::NetworkError {
            message: err.to_string(),
        };
    }
    IntentoError::HttpError(err)
}

fn is_dns_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(e) = source {
        let message = e.to_string().to_lowercase();
        if message.contains("dns") || message.contains("lookup") {
            return true;
        }
        source = e.source();
    }
    false
}

/// Base URL for a host; hosts with an explicit scheme are used as given
pub fn base_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

/// User-Agent value: caller tag, SDK name/version and runtime
pub fn user_agent(tag: Option<&str>) -> String {
    let sdk = format!(
        "{}/{} rust ({}; {})",
        SDK_NAME,
        crate::VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => format!("{} {}", tag, sdk),
        None => sdk,
    }
}

/// Equivalent curl invocation, for debugging
pub fn curl_command(request: &TransportRequest) -> String {
    let mut parts = vec![format!("curl -X {} '{}'", request.method, request.url)];
    for (name, value) in &request.headers {
        parts.push(format!("-H '{}: {}'", name, value));
    }
    if let Some(body) = &request.body {
        parts.push(format!("-d '{}'", body.replace('\'', "'\\''")));
    }
    parts.join(" \\\n  ")
}

/// Turn a raw response into parsed JSON or an error
///
/// Empty bodies resolve to `null`. Bodies are JSON only when they start with
/// `{` or `[`; HTML pages and anything else are rejected whatever the status.
pub fn classify_response(status: u16, status_message: &str, body: &str) -> Result<Value> {
    let trimmed = body.trim_start();

    let data = match trimmed.chars().next() {
        None => None,
        Some('{') | Some('[') => Some(serde_json::from_str::<Value>(trimmed).map_err(|_| {
            IntentoError::UnexpectedResponse {
                status,
                body: body.to_string(),
            }
        })?),
        Some('<') => {
            return Err(IntentoError::HtmlResponse {
                status,
                body: body.to_string(),
            })
        }
        Some(_) => {
            return Err(IntentoError::UnexpectedResponse {
                status,
                body: body.to_string(),
            })
        }
    };

    if status >= 400 {
        return Err(match data {
            Some(value) if value.get("error").is_some() => api_error(status, value),
            other => IntentoError::Http {
                status,
                status_message: status_message.to_string(),
                body: other,
            },
        });
    }

    Ok(data.unwrap_or(Value::Null))
}

fn api_error(status: u16, body: Value) -> IntentoError {
    let (code, message) = match &body["error"] {
        Value::String(message) => (None, message.clone()),
        Value::Object(error) => (
            error.get("code").and_then(Value::as_i64),
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(error.clone()).to_string()),
        ),
        other => (None, other.to_string()),
    };
    IntentoError::Api {
        status,
        code,
        message,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_with_query() {
        let request = RequestDescriptor::get("/ai/text/translate").with_params(vec![
            ("to".to_string(), "es".to_string()),
            ("bulk".to_string(), "true".to_string()),
        ]);
        assert_eq!(request.path_with_query(), "/ai/text/translate?to=es&bulk=true");

        let encoded = RequestDescriptor::get("/x")
            .with_params(vec![("q".to_string(), "a b&c".to_string())]);
        assert_eq!(encoded.path_with_query(), "/x?q=a%20b%26c");

        assert_eq!(RequestDescriptor::get("/x").path_with_query(), "/x");
    }

    #[test]
    fn test_raw_body_wins() {
        let request = RequestDescriptor::post("/x")
            .with_content(json!({"a": 1}))
            .with_data(r#"{"b":2}"#);
        assert_eq!(request.body().unwrap().as_deref(), Some(r#"{"b":2}"#));
    }

    #[test]
    fn test_invalid_raw_body_rejected() {
        let err = RequestDescriptor::post("/x").with_data("{not json").body().unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_content_key_order_preserved() {
        let request = RequestDescriptor::post("/x").with_content(json!({"z": 1, "a": 2, "m": 3}));
        assert_eq!(request.body().unwrap().unwrap(), r#"{"z":1,"a":2,"m":3}"#);
        assert_eq!(RequestDescriptor::get("/x").body().unwrap(), None);
    }

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("api.inten.to"), "https://api.inten.to");
        assert_eq!(base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_user_agent() {
        let plain = user_agent(None);
        assert!(plain.starts_with(&format!("{}/{}", SDK_NAME, crate::VERSION)));

        let tagged = user_agent(Some("Intento.CLI/0.1.0"));
        assert!(tagged.starts_with("Intento.CLI/0.1.0 intento-rust/"));
        assert!(tagged.contains(std::env::consts::OS));
    }

    #[test]
    fn test_curl_command() {
        let request = TransportRequest {
            method: Method::POST,
            url: "https://api.inten.to/ai/text/translate".to_string(),
            headers: vec![("apikey".to_string(), "k".to_string())],
            body: Some(r#"{"text":"it's"}"#.to_string()),
        };
        let command = curl_command(&request);
        assert!(command.starts_with("curl -X POST 'https://api.inten.to/ai/text/translate'"));
        assert!(command.contains("-H 'apikey: k'"));
        assert!(command.contains(r#"-d '{"text":"it'\''s"}'"#));
    }

    #[test]
    fn test_classify_json_and_empty() {
        assert_eq!(classify_response(200, "OK", "").unwrap(), Value::Null);
        assert_eq!(
            classify_response(200, "OK", r#"{"results":["hola"]}"#).unwrap(),
            json!({"results": ["hola"]})
        );
        assert_eq!(classify_response(200, "OK", "[1,2]").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_classify_html() {
        let err = classify_response(404, "Not Found", "<html>nope</html>").unwrap_err();
        assert!(matches!(err, IntentoError::HtmlResponse { status: 404, .. }));
        assert!(err.to_string().contains("4xx"));

        let err = classify_response(200, "OK", "<html>odd</html>").unwrap_err();
        assert!(err.to_string().to_lowercase().contains("unexpected 2xx or 3xx"));
    }

    #[test]
    fn test_classify_unexpected() {
        let err = classify_response(200, "OK", "plain text").unwrap_err();
        assert!(matches!(err, IntentoError::UnexpectedResponse { .. }));
        assert!(err.to_string().contains("plain text"));

        let broken = classify_response(200, "OK", "{broken").unwrap_err();
        assert!(matches!(broken, IntentoError::UnexpectedResponse { .. }));
    }

    #[test]
    fn test_classify_api_error() {
        let body = r#"{"error":{"code":404,"message":"no such intent ai/"}}"#;
        match classify_response(404, "Not Found", body).unwrap_err() {
            IntentoError::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, Some(404));
                assert_eq!(message, "no such intent ai/");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match classify_response(404, "Not Found", r#"{"error":"No such endpoint."}"#).unwrap_err() {
            IntentoError::Api { message, code, .. } => {
                assert_eq!(message, "No such endpoint.");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_synthesized_http_error() {
        match classify_response(404, "Not Found", "").unwrap_err() {
            IntentoError::Http {
                status,
                status_message,
                body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_message, "Not Found");
                assert!(body.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = classify_response(502, "Bad Gateway", r#"{"detail":"down"}"#).unwrap_err();
        assert_eq!(err.status(), Some(502));
    }
}
