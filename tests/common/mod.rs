//! Shared fixtures: a scriptable in-memory transport and JSON builders.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use reddit_rs::client::{Body, HttpRequest, HttpResponse, Transport};
use reddit_rs::{ClientConfig, Error, RedditClient, Result, RetryConfig, Session};

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A canned reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Drop(String),
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Respond(HttpResponse::new(200, body.to_string()))
    }

    pub fn status(status: u16, body: Value) -> Self {
        Reply::Respond(HttpResponse::new(status, body.to_string()))
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Reply::Respond(HttpResponse::new(status, body))
    }

    pub fn with_header(self, name: &'static str, value: &'static str) -> Self {
        match self {
            Reply::Respond(mut response) => {
                response
                    .headers
                    .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
                Reply::Respond(response)
            }
            other => other,
        }
    }

    fn into_result(self) -> Result<HttpResponse> {
        match self {
            Reply::Respond(response) => Ok(response),
            Reply::Drop(reason) => Err(Error::Transport(reason)),
        }
    }
}

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub authorization: Option<String>,
    pub at: Instant,
}

type Handler = Box<dyn Fn(&Recorded) -> Reply + Send + Sync>;

/// In-memory [`Transport`] routing on the URL path.
///
/// Scripted routes replay their replies in order and repeat the last one.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    handlers: Mutex<HashMap<String, Handler>>,
    log: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, path: &str, replies: Vec<Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(path.to_string(), replies.into());
    }

    pub fn route(&self, path: &str, handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) {
        self.handlers
            .lock()
            .unwrap()
            .insert(path.to_string(), Box::new(handler));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let form = match &request.body {
            Body::Form(pairs) => pairs.iter().cloned().collect(),
            _ => HashMap::new(),
        };
        let recorded = Recorded {
            method: request.method.clone(),
            path: request.url.path().to_string(),
            query: request.url.query_pairs().into_owned().collect(),
            form,
            authorization: request
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            at: Instant::now(),
        };
        self.log.lock().unwrap().push(recorded.clone());

        if let Some(handler) = self.handlers.lock().unwrap().get(&recorded.path) {
            return handler(&recorded).into_result();
        }

        let mut scripts = self.scripts.lock().unwrap();
        let reply = match scripts.get_mut(&recorded.path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        reply
            .unwrap_or_else(|| Reply::status(404, json!({"message": "Not Found", "error": 404})))
            .into_result()
    }
}

/// Configuration pointing at the mock with fast retries.
pub fn test_config() -> ClientConfig {
    ClientConfig::default()
        .with_oauth_url("https://oauth.reddit.test")
        .with_reddit_url("https://www.reddit.test")
        .with_user_agent("reddit-rs-tests/0.1")
        .with_retry(
            RetryConfig::default().with_initial_backoff(std::time::Duration::from_millis(100)),
        )
}

/// A client holding a fixed bearer token.
pub fn client(transport: Arc<MockTransport>) -> RedditClient {
    init_logging();
    RedditClient::with_session(transport, Session::from_access_token("test-token"), test_config())
}

/// A `Listing` envelope of things of one kind.
pub fn listing(kind: &str, things: Vec<Value>, after: Option<String>) -> Value {
    let children: Vec<Value> = things
        .into_iter()
        .map(|data| json!({"kind": kind, "data": data}))
        .collect();
    json!({
        "kind": "Listing",
        "data": {"after": after, "before": null, "children": children}
    })
}

pub fn submission(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("t3_{id}"),
        "title": format!("post {id}"),
        "author": "someone",
        "subreddit": "rust",
        "permalink": format!("/r/rust/comments/{id}/"),
        "score": 1,
        "created_utc": 1700000000.0,
        "edited": false,
    })
}

pub fn comment(id: &str, link: &str) -> Value {
    json!({
        "id": id,
        "name": format!("t1_{id}"),
        "body": format!("comment {id}"),
        "author": "someone",
        "subreddit": "rust",
        "link_id": format!("t3_{link}"),
        "parent_id": format!("t3_{link}"),
        "edited": 1700000100.5,
    })
}

pub fn subreddit(name: &str) -> Value {
    json!({
        "id": format!("id{name}"),
        "name": format!("t5_id{name}"),
        "display_name": name,
        "title": format!("{name} title"),
        "subscribers": 1000,
        "url": format!("/r/{name}/"),
    })
}

pub fn ratelimit_error(message: &str) -> Value {
    json!({"json": {"errors": [["RATELIMIT", message, "ratelimit"]]}})
}

pub fn token(access: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "*",
    })
}
