//! HTTP request builder for the Todo Manager REST API.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{normalize_base_url, ClientConfig, HTTP_TIMEOUT_SECS};
use crate::error::{ClientError, Result};

/// User agent string identifying the story suite.
const USER_AGENT: &str = concat!("todomanager-stories/", env!("CARGO_PKG_VERSION"));

/// Verbs the suite sends to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }

    /// POST and PUT carry a JSON body (possibly empty).
    pub fn sends_body(self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            _ => Err(ClientError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body the service sends with 4xx answers.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "errorMessages", default)]
    error_messages: Vec<String>,
}

/// Status code and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Messages from the service's `{"errorMessages": [...]}` envelope.
    ///
    /// Empty when the body is not JSON or carries no messages.
    pub fn error_messages(&self) -> Vec<String> {
        serde_json::from_str::<ErrorEnvelope>(&self.body)
            .unwrap_or_default()
            .error_messages
    }
}

/// Create a configured HTTP client.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Thin request builder bound to one Todo Manager base URL.
#[derive(Debug, Clone)]
pub struct TodoManagerClient {
    http: Client,
    base_url: String,
}

impl TodoManagerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: create_client()?,
            base_url: normalize_base_url(&base_url.into()),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = normalize_base_url(&base_url.into());
    }

    /// Absolute URL for an endpoint such as `/projects/1`.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.is_empty() || endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Send one request and collect status and body.
    ///
    /// POST and PUT always declare a JSON content type; a missing body goes out empty.
    /// GET, DELETE and HEAD ignore `body`.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.url(endpoint);
        tracing::debug!(method = %method, url = %url, "Sending request");

        let mut request = self.http.request(method.to_reqwest(), &url);
        if method.sends_body() {
            let payload = body.map(Value::to_string).unwrap_or_default();
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(method = %method, url = %url, status, "Received response");
        Ok(ApiResponse { status, body })
    }

    /// Like [`send`](Self::send) with the verb given as text, e.g. from a feature file.
    pub async fn send_named(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let method: Method = method.parse()?;
        self.send(method, endpoint, body).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::Get, endpoint, None).await
    }

    pub async fn head(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::Head, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.send(Method::Post, endpoint, body).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.send(Method::Put, endpoint, body).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::Delete, endpoint, None).await
    }
}
