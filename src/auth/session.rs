//! OAuth session management.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::client::{Body, ClientConfig, HttpRequest, Transport};
use crate::{Error, Result};

use super::Credentials;

const TOKEN_PATH: &str = "/api/v1/access_token";

/// Authentication session for the Reddit API.
///
/// The session holds the current bearer token and, when created from
/// [`Credentials`], everything needed to obtain a new one.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and shared across tasks. Token refresh takes
/// the write lock, so concurrent requests wait for one refresh instead of
/// racing to issue several.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    access_token: SecretString,
    expires_at: Option<DateTime<Utc>>,
    refresh_token: Option<SecretString>,
    scope: Option<String>,
    authenticator: Option<Authenticator>,
}

/// What a session needs to talk to the token endpoint again.
struct Authenticator {
    transport: Arc<dyn Transport>,
    token_url: Url,
    user_agent: String,
    credentials: Credentials,
}

impl Session {
    /// Obtain a token for `credentials` from the token endpoint.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use reddit_rs::auth::{Credentials, Session};
    /// use reddit_rs::client::{ClientConfig, ReqwestTransport};
    ///
    /// # async fn example() -> reddit_rs::Result<()> {
    /// let config = ClientConfig::default();
    /// let transport = Arc::new(ReqwestTransport::new(&config)?);
    /// let session = Session::authenticate(transport, Credentials::from_env()?, &config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn authenticate(
        transport: Arc<dyn Transport>,
        credentials: Credentials,
        config: &ClientConfig,
    ) -> Result<Self> {
        let token_url = Url::parse(&format!(
            "{}{}",
            config.reddit_url.trim_end_matches('/'),
            TOKEN_PATH
        ))?;
        let authenticator = Authenticator {
            transport,
            token_url,
            user_agent: config.user_agent.clone(),
            credentials,
        };

        let form = authenticator.credentials.grant_form();
        let token = authenticator.request_token(form).await?;
        tracing::info!(
            grant = authenticator.credentials.grant_name(),
            scope = token.scope.as_deref().unwrap_or(""),
            "obtained access token"
        );

        Ok(Self {
            inner: Arc::new(RwLock::new(SessionInner {
                access_token: SecretString::from(token.access_token),
                expires_at: Some(token.expires_at),
                refresh_token: token.refresh_token.map(SecretString::from),
                scope: token.scope,
                authenticator: Some(authenticator),
            })),
        })
    }

    /// Wrap a token issued elsewhere. Such a session cannot refresh.
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                access_token: SecretString::from(access_token.into()),
                expires_at: None,
                refresh_token: None,
                scope: None,
                authenticator: None,
            })),
        }
    }

    /// Check if the session token has expired.
    pub async fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero()).await
    }

    /// Check if the session will expire within the given buffer period.
    ///
    /// Tokens without a known expiry never expire.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        self.inner.read().await.expires_within(buffer)
    }

    /// Get the session expiration time, if known.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.expires_at
    }

    /// Scopes granted to the current token.
    pub async fn scope(&self) -> Option<String> {
        self.inner.read().await.scope.clone()
    }

    /// Whether [`refresh`](Self::refresh) can obtain a new token.
    pub async fn can_refresh(&self) -> bool {
        self.inner.read().await.authenticator.is_some()
    }

    /// Obtain a new access token.
    ///
    /// Uses the refresh token when the server issued one, otherwise repeats
    /// the original grant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionExpired`] for sessions created from a bare
    /// access token, and [`Error::Authentication`] if the server rejects
    /// the grant.
    pub async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.renew().await
    }

    /// Refresh only if the token expires within `buffer`.
    ///
    /// Expiry is checked again under the write lock, so callers that queued
    /// behind another refresh see the new token and return `Ok(false)`.
    pub(crate) async fn refresh_if_expiring(&self, buffer: Duration) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.authenticator.is_none() || !inner.expires_within(buffer) {
            return Ok(false);
        }
        inner.renew().await?;
        Ok(true)
    }

    /// Get the current access token.
    pub(crate) async fn access_token(&self) -> SecretString {
        self.inner.read().await.access_token.clone()
    }
}

impl SessionInner {
    fn expires_within(&self, buffer: Duration) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() + buffer >= at)
    }

    async fn renew(&mut self) -> Result<()> {
        let Some(authenticator) = &self.authenticator else {
            return Err(Error::SessionExpired);
        };

        let form = match &self.refresh_token {
            Some(token) => {
                let refresh = Credentials {
                    grant: super::Grant::RefreshToken(token.clone()),
                    ..authenticator.credentials.clone()
                };
                refresh.grant_form()
            }
            None => authenticator.credentials.grant_form(),
        };
        let token = authenticator.request_token(form).await?;
        tracing::info!(expires_at = %token.expires_at, "refreshed access token");

        self.access_token = SecretString::from(token.access_token);
        self.expires_at = Some(token.expires_at);
        if let Some(refresh_token) = token.refresh_token {
            self.refresh_token = Some(SecretString::from(refresh_token));
        }
        if token.scope.is_some() {
            self.scope = token.scope;
        }
        Ok(())
    }
}

impl Authenticator {
    async fn request_token(&self, form: Vec<(String, String)>) -> Result<TokenResponse> {
        let mut request = HttpRequest::new(Method::POST, self.token_url.clone());
        request.headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|_| Error::Config("Invalid user agent".to_string()))?,
        );
        request.basic_auth = Some(self.credentials.basic_auth());
        request.body = Body::Form(form);

        let response = self.transport.send(request).await?;
        let body: serde_json::Value = response.json().unwrap_or_default();

        if !response.is_success() {
            return Err(Error::Authentication(format!(
                "Token request failed ({}): {}",
                response.status, body
            )));
        }
        // Reddit reports bad grants with a 200 and an `error` field.
        if let Some(error) = body.get("error") {
            return Err(Error::Authentication(format!("Token request rejected: {error}")));
        }

        let mut token: TokenResponse = serde_json::from_value(body)?;
        token.expires_at = Utc::now() + Duration::seconds(token.expires_in);
        Ok(token)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &"...")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: Option<String>,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(skip, default = "Utc::now")]
    expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpResponse;
    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use std::sync::Mutex;

    struct TokenEndpoint {
        responses: Mutex<Vec<HttpResponse>>,
        forms: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl TokenEndpoint {
        fn new(responses: Vec<HttpResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                forms: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for TokenEndpoint {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            assert_eq!(request.url.path(), TOKEN_PATH);
            assert!(request.basic_auth.is_some());
            if let Body::Form(form) = request.body {
                self.forms.lock().unwrap().push(form);
            }
            Ok(self.responses.lock().unwrap().remove(0))
        }
    }

    fn token(access: &str, refresh: Option<&str>) -> HttpResponse {
        token_for(access, refresh, 3600)
    }

    fn token_for(access: &str, refresh: Option<&str>, expires_in: i64) -> HttpResponse {
        let mut body = serde_json::json!({
            "access_token": access,
            "token_type": "bearer",
            "expires_in": expires_in,
            "scope": "*",
        });
        if let Some(refresh) = refresh {
            body["refresh_token"] = refresh.into();
        }
        HttpResponse::new(200, body.to_string())
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::from_access_token("super-secret-token");
        let debug_str = format!("{session:?}");
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_bare_token_cannot_refresh() {
        let session = Session::from_access_token("abc");
        assert!(!session.is_expired().await);
        assert!(!session.can_refresh().await);
        assert!(matches!(session.refresh().await, Err(Error::SessionExpired)));
    }

    #[tokio::test]
    async fn test_authenticate_and_refresh_with_refresh_token() {
        let endpoint = TokenEndpoint::new(vec![token("first", Some("rt-1")), token("second", None)]);
        let creds = Credentials::password("id", "secret", "bot", "pw");
        let session = Session::authenticate(endpoint.clone(), creds, &ClientConfig::default())
            .await
            .unwrap();

        assert!(session.can_refresh().await);
        assert!(!session.expires_within(Duration::seconds(60)).await);
        session.refresh().await.unwrap();

        let forms = endpoint.forms.lock().unwrap();
        assert!(forms[0].contains(&("grant_type".to_string(), "password".to_string())));
        assert!(forms[1].contains(&("grant_type".to_string(), "refresh_token".to_string())));
        assert!(forms[1].contains(&("refresh_token".to_string(), "rt-1".to_string())));
    }

    #[tokio::test]
    async fn test_queued_refreshes_reuse_the_new_token() {
        let endpoint = TokenEndpoint::new(vec![
            token_for("first", None, 30),
            token_for("second", None, 3600),
        ]);
        let creds = Credentials::client_credentials("id", "secret");
        let session = Session::authenticate(endpoint.clone(), creds, &ClientConfig::default())
            .await
            .unwrap();

        let buffer = Duration::seconds(60);
        let (a, b) = tokio::join!(
            session.refresh_if_expiring(buffer),
            session.refresh_if_expiring(buffer)
        );
        let refreshed = [a.unwrap(), b.unwrap()];

        assert_eq!(refreshed.iter().filter(|r| **r).count(), 1);
        assert_eq!(endpoint.forms.lock().unwrap().len(), 2);
        assert_eq!(session.access_token().await.expose_secret(), "second");
        assert!(!session.refresh_if_expiring(buffer).await.unwrap());
    }

    #[tokio::test]
    async fn test_bare_token_never_refreshes_on_expiry_check() {
        let session = Session::from_access_token("abc");
        assert!(!session.refresh_if_expiring(Duration::seconds(60)).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_grant_is_authentication_error() {
        let endpoint = TokenEndpoint::new(vec![HttpResponse::new(200, r#"{"error": "invalid_grant"}"#)]);
        let creds = Credentials::password("id", "secret", "bot", "wrong");
        let err = Session::authenticate(endpoint, creds, &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_auth_error());

        let endpoint = TokenEndpoint::new(vec![HttpResponse::new(401, r#"{"message": "Unauthorized"}"#)]);
        let creds = Credentials::client_credentials("id", "bad");
        let err = Session::authenticate(endpoint, creds, &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
