//! The HTTP seam.
//!
//! Everything the client sends goes through a [`Transport`]. The default
//! [`ReqwestTransport`] wraps a pooled `reqwest::Client`; tests and
//! alternative stacks supply their own implementation.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::{Error, Result};

use super::config::ClientConfig;

/// Request body variants the API uses.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// A JSON document
    Json(Value),
}

/// HTTP basic credentials, used by the token endpoint.
pub struct BasicAuth {
    /// User name (the OAuth client id)
    pub username: String,
    /// Password (the OAuth client secret); empty for installed apps
    pub password: SecretString,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A fully resolved request, ready to put on the wire.
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including the query string
    pub url: Url,
    /// Extra headers (authorization, user agent)
    pub headers: HeaderMap,
    /// Basic auth, if any
    pub basic_auth: Option<BasicAuth>,
    /// Request body
    pub body: Body,
}

impl HttpRequest {
    /// A bare request with no headers or body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            basic_auth: None,
            body: Body::Empty,
        }
    }

    /// The query value for `key`, if present.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// The form value for `key`, if the body is a form.
    pub fn form_param(&self, key: &str) -> Option<&str> {
        match &self.body {
            Body::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// What came back from the server.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body text
    pub body: String,
}

impl HttpResponse {
    /// Build a response; handy for mock transports.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends one HTTP request and returns the raw response.
///
/// Implementations report network failures as [`Error::Transport`]; any
/// status code, including errors, is a successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honoring the configured timeout and user agent.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Form(pairs) => builder.form(pairs),
            Body::Json(value) => builder.json(value),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_debug_redacts_password() {
        let auth = BasicAuth {
            username: "client".into(),
            password: SecretString::from("hunter2".to_string()),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_request_params() {
        let url = Url::parse("https://oauth.reddit.com/r/rust/new?limit=5&raw_json=1").unwrap();
        let mut request = HttpRequest::new(Method::POST, url);
        request.body = Body::Form(vec![("kind".into(), "self".into())]);

        assert_eq!(request.query_param("limit").as_deref(), Some("5"));
        assert_eq!(request.query_param("after"), None);
        assert_eq!(request.form_param("kind"), Some("self"));
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse::new(200, r#"{"ok": true}"#);
        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["ok"], true);
        assert!(HttpResponse::new(200, "<html>").json().is_err());
    }
}
