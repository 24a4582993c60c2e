//! Cursor-paginated listing stream.
//!
//! This module provides [`ListingGenerator`], a `Stream` that lazily walks a
//! Reddit listing page by page, and [`ListingBuilder`], which wires a
//! generator to an API path.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;

use super::{Page, PageRequest, StreamGenerator, StreamOptions, StreamPoll};
use crate::client::{ApiRequest, ClientInner};
use crate::models::{Cursor, Listable};
use crate::Result;

/// Default number of items a listing yields when no limit is given.
pub const DEFAULT_LIMIT: usize = 100;

/// Largest page Reddit serves.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Type alias for a boxed future used by page fetchers.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

type FetchPage<T> = Box<dyn Fn(PageRequest) -> BoxFuture<'static, Result<Page<T>>> + Send + Sync>;

/// A stream that lazily fetches pages from a paginated endpoint.
///
/// Items are yielded in page order. The next page is requested only once the
/// buffered items of the current one are consumed, and never after the
/// listing is exhausted (no `after` cursor, a repeated cursor, an empty page,
/// or the caller's limit reached).
///
/// A failed fetch is yielded as an `Err` without advancing the cursor, so
/// polling again retries the same page. A generator cannot be rewound; to
/// restart, build a new one from [`cursor`](Self::cursor).
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let mut newest = client.subreddit("rust").new().limit(250).build();
///
/// while let Some(result) = newest.next().await {
///     let submission = result?;
///     println!("{}", submission.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ListingGenerator<T> {
    /// Function to fetch a page after a cursor.
    fetch_page: FetchPage<T>,
    /// Items of the current page not yet yielded.
    buffer: VecDeque<T>,
    /// Cursor of the last fetched page.
    cursor: Option<Cursor>,
    /// Maximum number of items to yield, `None` for unbounded.
    limit: Option<usize>,
    page_size: usize,
    yielded: usize,
    pages_fetched: usize,
    exhausted: bool,
    /// Current in-flight fetch future.
    pending_fetch: Option<BoxFuture<'static, Result<Page<T>>>>,
}

impl<T: Listable> ListingGenerator<T> {
    /// Create a generator over a page-fetch function.
    ///
    /// Defaults to [`DEFAULT_LIMIT`] items in pages of
    /// [`DEFAULT_PAGE_SIZE`], starting from the top of the listing.
    pub fn new<F>(fetch_page: F) -> Self
    where
        F: Fn(PageRequest) -> BoxFuture<'static, Result<Page<T>>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            buffer: VecDeque::new(),
            cursor: None,
            limit: Some(DEFAULT_LIMIT),
            page_size: DEFAULT_PAGE_SIZE,
            yielded: 0,
            pages_fetched: 0,
            exhausted: false,
            pending_fetch: None,
        }
    }

    /// Set the maximum number of items; `None` drains the whole listing.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Set the number of items requested per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resume after a cursor saved from an earlier generator.
    pub fn starting_after(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl<T> ListingGenerator<T> {
    /// The cursor following the last fetched page.
    ///
    /// Passing it to [`starting_after`](Self::starting_after) on a new
    /// generator resumes at the first item of the next page.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Number of items yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns `true` once no further page will be requested.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.yielded >= limit)
    }

    fn next_request(&self) -> PageRequest {
        let wanted = match self.limit {
            Some(limit) => (limit - self.yielded).min(self.page_size),
            None => self.page_size,
        };
        PageRequest {
            after: self.cursor.clone(),
            limit: wanted,
        }
    }

    fn accept(&mut self, page: Page<T>) {
        self.pages_fetched += 1;

        if page.items.is_empty() {
            self.exhausted = true;
            return;
        }

        match page.after {
            Some(after) if self.cursor.as_ref() != Some(&after) => {
                self.cursor = Some(after);
            }
            _ => self.exhausted = true,
        }
        self.buffer.extend(page.items);
    }
}

impl<T> Stream for ListingGenerator<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.limit_reached() {
                this.exhausted = true;
                this.buffer.clear();
                return Poll::Ready(None);
            }

            // If we have items in the current page, yield the next one
            if let Some(item) = this.buffer.pop_front() {
                this.yielded += 1;
                return Poll::Ready(Some(Ok(item)));
            }

            if let Some(ref mut fut) = this.pending_fetch {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending_fetch = None;
                        this.accept(page);
                        if this.buffer.is_empty() {
                            return Poll::Ready(None);
                        }
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        // Cursor untouched: the next poll refetches this page.
                        this.pending_fetch = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            }

            if this.exhausted {
                return Poll::Ready(None);
            }

            let request = this.next_request();
            tracing::trace!(after = ?request.after, limit = request.limit, "fetching listing page");
            this.pending_fetch = Some((this.fetch_page)(request));
        }
    }
}

impl<T> Unpin for ListingGenerator<T> {}

impl<T> std::fmt::Debug for ListingGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingGenerator")
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .field("page_size", &self.page_size)
            .field("yielded", &self.yielded)
            .field("pages_fetched", &self.pages_fetched)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

/// Builder for listing generators bound to an API path.
pub struct ListingBuilder<T> {
    inner: Arc<ClientInner>,
    path: String,
    params: Vec<(String, String)>,
    limit: Option<usize>,
    page_size: usize,
    after: Option<Cursor>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Clone for ListingBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            path: self.path.clone(),
            params: self.params.clone(),
            limit: self.limit,
            page_size: self.page_size,
            after: self.after.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Listable> ListingBuilder<T> {
    pub(crate) fn new(inner: Arc<ClientInner>, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
            params: Vec::new(),
            limit: Some(DEFAULT_LIMIT),
            page_size: DEFAULT_PAGE_SIZE,
            after: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Add a query parameter sent with every page request.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value.into()));
        self
    }

    /// Yield at most `limit` items.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Drain the listing completely.
    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Set the number of items per page (Reddit caps this at 100).
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Start after a saved cursor.
    pub fn after(mut self, cursor: impl Into<Cursor>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Only return items newer than `cursor`.
    pub fn before(self, cursor: impl Into<Cursor>) -> Self {
        let cursor = cursor.into();
        self.param("before", cursor.as_str())
    }

    /// Build the generator.
    pub fn build(self) -> ListingGenerator<T> {
        let inner = self.inner;
        let path = self.path;
        let params = self.params;

        ListingGenerator::new(move |request: PageRequest| {
            let inner = inner.clone();
            let path = path.clone();
            let mut query = params.clone();

            Box::pin(async move {
                query.push(("limit".to_string(), request.limit.to_string()));
                if let Some(after) = request.after {
                    query.push(("after".to_string(), after.to_string()));
                }
                let value = inner.execute(ApiRequest::get(path).query(query)).await?;
                Page::from_listing(value)
            })
        })
        .with_limit(self.limit)
        .with_page_size(self.page_size)
        .starting_after(self.after)
    }

    /// Poll the newest page of this listing forever.
    ///
    /// See [`StreamGenerator`] for the deduplication and backoff rules.
    pub fn stream(self, options: StreamOptions) -> StreamGenerator<T> {
        let base = self;
        StreamGenerator::new(
            move |poll: StreamPoll| {
                let mut builder = base.clone().limit(poll.limit).page_size(poll.limit.max(1));
                if let Some(before) = poll.before {
                    builder = builder.before(before);
                }
                builder.build()
            },
            options,
        )
    }
}
