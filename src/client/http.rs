//! The client handle and its shared state.

use std::sync::Arc;

use chrono::Duration;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::api::{
    CommentHandle, FrontService, RedditorHandle, SubmissionHandle, SubredditHandle,
    SubredditsService,
};
use crate::auth::{Credentials, Session};
use crate::listing::Page;
use crate::models::{Fullname, Redditor, Thing};
use crate::{Error, Result};

use super::config::ClientConfig;
use super::rate_limit::RateLimiter;
use super::request::ApiRequest;
use super::transport::{ReqwestTransport, Transport};

/// Maximum fullnames `/api/info` accepts per call.
const INFO_BATCH: usize = 100;

/// The main client for interacting with the Reddit API.
///
/// One client is one authenticated session with its own rate limit budget.
/// Cloning is cheap and shares both; independent accounts need independent
/// clients.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use reddit_rs::{Credentials, RedditClient};
///
/// # async fn example() -> reddit_rs::Result<()> {
/// let client = RedditClient::login(Credentials::from_env()?).await?;
///
/// let posts: Vec<_> = client
///     .subreddit("rust")
///     .hot()
///     .limit(10)
///     .build()
///     .try_collect()
///     .await?;
/// for post in posts {
///     println!("{} ({})", post.title, post.score);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedditClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
    pub(crate) limiter: Mutex<RateLimiter>,
}

impl RedditClient {
    /// Authenticate with default configuration.
    pub async fn login(credentials: Credentials) -> Result<Self> {
        Self::login_with_config(credentials, ClientConfig::default()).await
    }

    /// Authenticate with custom configuration.
    pub async fn login_with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(transport, credentials, config).await
    }

    /// Authenticate over a caller-supplied transport.
    pub async fn with_transport(
        transport: Arc<dyn Transport>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::authenticate(transport.clone(), credentials, &config).await?;
        Ok(Self::with_session(transport, session, config))
    }

    /// Create a client over an existing session.
    pub fn with_session(transport: Arc<dyn Transport>, session: Session, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                session,
                config,
                limiter: Mutex::new(RateLimiter::new()),
            }),
        }
    }

    /// Create a client from a pre-issued bearer token.
    pub fn with_access_token(access_token: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_session(
            transport,
            Session::from_access_token(access_token),
            config,
        ))
    }

    /// A lazy handle to a subreddit.
    pub fn subreddit(&self, name: impl Into<String>) -> SubredditHandle {
        SubredditHandle::stub(self.inner.clone(), name)
    }

    /// A lazy handle to a submission by base-36 id.
    pub fn submission(&self, id: impl Into<String>) -> SubmissionHandle {
        SubmissionHandle::stub(self.inner.clone(), id)
    }

    /// A lazy handle to a comment by base-36 id.
    pub fn comment(&self, id: impl Into<String>) -> CommentHandle {
        CommentHandle::stub(self.inner.clone(), id)
    }

    /// A lazy handle to a redditor by name.
    pub fn redditor(&self, name: impl Into<String>) -> RedditorHandle {
        RedditorHandle::stub(self.inner.clone(), name)
    }

    /// The front page.
    pub fn front(&self) -> FrontService {
        FrontService::new(self.inner.clone())
    }

    /// Subreddit discovery listings.
    pub fn subreddits(&self) -> SubredditsService {
        SubredditsService::new(self.inner.clone())
    }

    /// The authenticated account.
    pub async fn me(&self) -> Result<Redditor> {
        let value = self.inner.execute(ApiRequest::get("/api/v1/me")).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Look up things by fullname, in the order given.
    ///
    /// Requests are batched 100 fullnames at a time. Fullnames the server
    /// does not know are omitted from the result.
    pub async fn info(&self, fullnames: &[Fullname]) -> Result<Vec<Thing>> {
        self.inner.info(fullnames).await
    }

    /// Execute an arbitrary API request and return its JSON body.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        self.inner.execute(request).await
    }

    /// Manually refresh the session token.
    pub async fn refresh_session(&self) -> Result<()> {
        self.inner.session.refresh().await
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Snapshot of the current rate limit budget.
    pub async fn rate_limit(&self) -> RateLimiter {
        self.inner.limiter.lock().await.clone()
    }
}

impl ClientInner {
    /// Refresh the token if it is about to expire.
    pub(crate) async fn ensure_session_valid(&self) -> Result<()> {
        if self.config.auto_refresh_session {
            let buffer = Duration::seconds(self.config.refresh_buffer_secs);
            if self.session.expires_within(buffer).await {
                self.session.refresh_if_expiring(buffer).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn info(&self, fullnames: &[Fullname]) -> Result<Vec<Thing>> {
        let mut things = Vec::with_capacity(fullnames.len());
        for batch in fullnames.chunks(INFO_BATCH) {
            let ids = batch
                .iter()
                .map(Fullname::as_str)
                .collect::<Vec<_>>()
                .join(",");
            let value = self
                .execute(ApiRequest::get("/api/info").param("id", ids))
                .await?;
            let page: Page<Thing> = Page::from_listing(value)?;
            things.extend(page.items);
        }
        Ok(things)
    }

    /// Fetch exactly one thing by fullname.
    pub(crate) async fn info_one(&self, fullname: &Fullname, kind: &'static str) -> Result<Thing> {
        self.info(std::slice::from_ref(fullname))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("{kind} {fullname}")))
    }
}

impl std::fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish()
    }
}
