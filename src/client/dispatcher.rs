//! Request dispatch: rate limiting, authentication, classification, retry.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER, USER_AGENT, WWW_AUTHENTICATE};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiErrorItem;
use crate::{Error, Result};

use super::http::ClientInner;
use super::request::ApiRequest;
use super::transport::{HttpRequest, HttpResponse};

/// Outcome of sending a request once.
#[derive(Debug)]
enum Attempt {
    Success(Value),
    RateLimited {
        wait: Duration,
        message: String,
        body: Value,
    },
    Transient(Error),
    Fatal(Error),
}

impl ClientInner {
    /// Execute one logical API call and return the parsed JSON body.
    ///
    /// A server-requested wait no longer than `ratelimit_seconds` is slept
    /// through (plus one second) and the request reissued once. Transient
    /// failures are retried with backoff only for requests marked
    /// safe to retry.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let mut failures = 0u32;
        let mut rate_limited = false;

        loop {
            let error = match self.attempt(&request).await {
                Attempt::Success(value) => return Ok(value),
                Attempt::Fatal(e) => return Err(e),
                Attempt::RateLimited {
                    wait,
                    message,
                    body,
                } => {
                    if rate_limited || wait > self.config.ratelimit_ceiling() {
                        warn!(
                            path = %request.path,
                            wait_ms = wait.as_millis() as u64,
                            "rate limit wait exceeds ceiling"
                        );
                        return Err(Error::RateLimitExceeded {
                            wait,
                            message,
                            body,
                        });
                    }
                    rate_limited = true;
                    let pause = wait + Duration::from_secs(1);
                    debug!(
                        path = %request.path,
                        pause_ms = pause.as_millis() as u64,
                        "rate limited; sleeping before retry"
                    );
                    tokio::time::sleep(pause).await;
                    continue;
                }
                Attempt::Transient(e) => e,
            };

            if !request.safe_retry || failures >= self.config.retry.max_retries {
                if failures > 0 {
                    warn!(path = %request.path, attempts = failures + 1, error = %error, "giving up");
                }
                return Err(error);
            }

            let backoff = self.config.retry.backoff_for_attempt(failures);
            failures += 1;
            debug!(
                path = %request.path,
                attempt = failures,
                backoff_ms = backoff.as_millis() as u64,
                error = %error,
                "retrying request"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    async fn attempt(&self, request: &ApiRequest) -> Attempt {
        // The lock is released before sleeping.
        let delay = self.limiter.lock().await.delay_before_next_call();
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "waiting for rate limit reset");
            tokio::time::sleep(delay).await;
        }

        if let Err(e) = self.ensure_session_valid().await {
            return Attempt::Fatal(e);
        }

        let http_request = match self.build_request(request).await {
            Ok(r) => r,
            Err(e) => return Attempt::Fatal(e),
        };

        let response = match self.transport.send(http_request).await {
            Ok(r) => r,
            Err(e) if e.is_retryable() => return Attempt::Transient(e),
            Err(e) => return Attempt::Fatal(e),
        };

        self.limiter.lock().await.observe(&response.headers);
        self.classify(response)
    }

    async fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.config.oauth_url.trim_end_matches('/'),
            request.path
        ))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("raw_json", "1");
        }

        let mut headers = HeaderMap::new();
        let token = self.session.access_token().await;
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("bearer {}", token.expose_secret()))
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|_| Error::Config("Invalid user agent".to_string()))?,
        );

        Ok(HttpRequest {
            method: request.method.clone(),
            url,
            headers,
            basic_auth: None,
            body: request.body.clone(),
        })
    }

    fn classify(&self, response: HttpResponse) -> Attempt {
        let status = response.status;
        let parsed: Option<Value> = serde_json::from_str(&response.body).ok();

        if response.is_success() {
            let Some(value) = parsed else {
                if response.body.trim().is_empty() {
                    return Attempt::Success(Value::Null);
                }
                return Attempt::Transient(Error::Transport(format!(
                    "malformed response body (status {status})"
                )));
            };

            let errors = api_errors(&value);
            if errors.is_empty() {
                return Attempt::Success(value);
            }
            let wait = errors
                .iter()
                .filter(|item| item.error_type == "RATELIMIT")
                .find_map(|item| parse_ratelimit_wait(&item.message).map(|w| (w, item)));
            if let Some((wait, item)) = wait {
                return Attempt::RateLimited {
                    wait,
                    message: item.message.clone(),
                    body: value,
                };
            }
            return Attempt::Fatal(Error::Api(errors));
        }

        let body = parsed.unwrap_or_else(|| Value::String(response.body.clone()));

        match status {
            429 => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Too Many Requests")
                    .to_string();
                let wait = retry_after(&response.headers)
                    .or_else(|| parse_ratelimit_wait(&message))
                    .unwrap_or_else(|| self.config.ratelimit_ceiling());
                Attempt::RateLimited {
                    wait,
                    message,
                    body,
                }
            }
            401 => Attempt::Fatal(Error::Authentication(describe(&body, "invalid or expired token"))),
            403 if response.headers.contains_key(WWW_AUTHENTICATE) => {
                Attempt::Fatal(Error::Authentication(describe(&body, "insufficient scope")))
            }
            404 => Attempt::Fatal(Error::NotFound(describe(&body, "Resource not found"))),
            s if self.config.retry.should_retry_status(s) => {
                Attempt::Transient(Error::from_api_response(s, body))
            }
            s => Attempt::Fatal(Error::from_api_response(s, body)),
        }
    }
}

fn describe(body: &Value, fallback: &str) -> String {
    body.get("message")
        .or_else(|| body.get("reason"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn api_errors(value: &Value) -> Vec<ApiErrorItem> {
    value
        .pointer("/json/errors")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(ApiErrorItem::from_value).collect())
        .unwrap_or_default()
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs: f64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Extract the wait from messages like "Try again in 6 seconds.".
///
/// Recognizes one to three digits followed by a millisecond, second or
/// minute unit; milliseconds keep their sub-second precision.
pub(crate) fn parse_ratelimit_wait(message: &str) -> Option<Duration> {
    let words: Vec<&str> = message.split_whitespace().collect();
    words.windows(2).find_map(|pair| {
        let digits = pair[0];
        if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let amount: u64 = digits.parse().ok()?;
        let unit = pair[1].trim_end_matches(|c: char| !c.is_ascii_alphabetic());
        match unit {
            "millisecond" | "milliseconds" => Some(Duration::from_millis(amount)),
            "second" | "seconds" => Some(Duration::from_secs(amount)),
            "minute" | "minutes" => Some(Duration::from_secs(amount * 60)),
            _ => None,
        }
    })
}
