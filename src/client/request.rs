//! Logical API requests.

use reqwest::Method;
use serde_json::Value;

use super::transport::Body;

/// One logical call against the OAuth API, before authentication and
/// rate limiting are applied.
///
/// `safe_retry` defaults to `true` for idempotent methods and `false` for
/// `POST` and `PATCH`, so a submission is never sent twice because of a
/// dropped connection.
///
/// # Example
///
/// ```
/// use reddit_rs::client::ApiRequest;
///
/// let request = ApiRequest::get("/r/rust/new").param("limit", 25);
/// assert!(request.is_safe_retry());
///
/// let submit = ApiRequest::post("/api/submit").form([("kind", "self")]);
/// assert!(!submit.is_safe_retry());
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Body,
    pub(crate) safe_retry: bool,
}

impl ApiRequest {
    /// A request with the default retry policy for `method`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let safe_retry = !matches!(method, Method::POST | Method::PATCH);
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            safe_retry,
        }
    }

    /// A `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append query parameters.
    pub fn query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append form fields, switching the body to a form.
    pub fn form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = match std::mem::take(&mut self.body) {
            Body::Form(fields) => fields,
            _ => Vec::new(),
        };
        fields.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.body = Body::Form(fields);
        self
    }

    /// Send a JSON body.
    pub fn json(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    /// Override whether transient failures may be retried.
    pub fn safe_retry(mut self, safe: bool) -> Self {
        self.safe_retry = safe;
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The API path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether transient failures may be retried.
    pub fn is_safe_retry(&self) -> bool {
        self.safe_retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_defaults_follow_method() {
        assert!(ApiRequest::get("/x").is_safe_retry());
        assert!(ApiRequest::put("/x").is_safe_retry());
        assert!(ApiRequest::delete("/x").is_safe_retry());
        assert!(!ApiRequest::post("/x").is_safe_retry());
        assert!(!ApiRequest::new(Method::PATCH, "/x").is_safe_retry());
        assert!(ApiRequest::post("/api/info").safe_retry(true).is_safe_retry());
    }

    #[test]
    fn test_form_fields_accumulate() {
        let request = ApiRequest::post("/api/vote")
            .form([("id", "t3_abc")])
            .form([("dir", "1")]);
        match request.body {
            Body::Form(fields) => assert_eq!(fields.len(), 2),
            other => panic!("expected form body, got {other:?}"),
        }
    }
}
