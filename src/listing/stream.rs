//! Live polling of a listing for new items.
//!
//! A [`StreamGenerator`] repeatedly drains one bounded page of the newest
//! items, walks it oldest first, and yields only fullnames it has not seen.
//! Dry polls back off by doubling the pause between polls up to a ceiling.
//!
//! Deduplication is bounded: an item evicted from the cache can be yielded a
//! second time, and an item pushed out of the newest page between two polls
//! is never seen. Choose `cache_capacity` well above the number of items
//! expected per poll interval.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::{Stream, TryStreamExt};

use super::{BoundedSet, BoxFuture, ListingGenerator, DEFAULT_PAGE_SIZE};
use crate::models::{Cursor, Fullname, Listable};
use crate::Result;

/// Without a `before` anchor, successive polls shave 0..30 items off the
/// page size so that Reddit does not answer from a cached response.
const CACHE_BUST_CYCLE: usize = 30;

/// What a stream poll asks the listing factory for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPoll {
    /// Number of newest items to fetch
    pub limit: usize,
    /// Only fetch items newer than this fullname
    pub before: Option<Cursor>,
}

/// One element of a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent<T> {
    /// A newly observed item
    Item(T),
    /// Emitted after `pause_after` dry polls in a row instead of sleeping
    Pause,
}

impl<T> StreamEvent<T> {
    /// The item, if this event carries one.
    pub fn into_item(self) -> Option<T> {
        match self {
            StreamEvent::Item(item) => Some(item),
            StreamEvent::Pause => None,
        }
    }
}

/// Configuration for a [`StreamGenerator`].
///
/// # Example
///
/// ```
/// use reddit_rs::listing::StreamOptions;
/// use std::time::Duration;
///
/// let options = StreamOptions::default()
///     .with_skip_existing(true)
///     .with_pause_after(Some(3))
///     .with_max_pause(Duration::from_secs(30));
/// assert_eq!(options.cache_capacity, 301);
/// ```
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Items fetched per poll
    pub page_size: usize,
    /// Fullnames remembered for deduplication
    pub cache_capacity: usize,
    /// First pause after a dry poll; zero disables sleeping
    pub min_pause: Duration,
    /// Ceiling for the doubling pause
    pub max_pause: Duration,
    /// Emit [`StreamEvent::Pause`] after more than this many dry polls
    pub pause_after: Option<u32>,
    /// Mark the first poll's items as seen without yielding them
    pub skip_existing: bool,
    /// Resume after this item: it is pre-seeded as seen and used as the
    /// initial `before` anchor
    pub continue_after_id: Option<Fullname>,
    /// Move the `before` anchor to the newest yielded item after each poll
    pub exclude_before: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache_capacity: 301,
            min_pause: Duration::from_secs(1),
            max_pause: Duration::from_secs(16),
            pause_after: None,
            skip_existing: false,
            continue_after_id: None,
            exclude_before: false,
        }
    }
}

impl StreamOptions {
    /// Set the number of items fetched per poll.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the deduplication cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the first pause after a dry poll.
    pub fn with_min_pause(mut self, pause: Duration) -> Self {
        self.min_pause = pause;
        self
    }

    /// Set the pause ceiling.
    pub fn with_max_pause(mut self, pause: Duration) -> Self {
        self.max_pause = pause;
        self
    }

    /// Emit pauses after this many consecutive dry polls.
    pub fn with_pause_after(mut self, pause_after: Option<u32>) -> Self {
        self.pause_after = pause_after;
        self
    }

    /// Skip the items present when the stream starts.
    pub fn with_skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// Resume after a previously seen item.
    pub fn with_continue_after(mut self, id: Fullname) -> Self {
        self.continue_after_id = Some(id);
        self
    }

    /// Anchor each poll at the newest yielded item.
    pub fn with_exclude_before(mut self, exclude: bool) -> Self {
        self.exclude_before = exclude;
        self
    }
}

/// Doubling pause between dry polls, capped at a maximum.
///
/// ```
/// use reddit_rs::listing::PollBackoff;
/// use std::time::Duration;
///
/// let mut backoff = PollBackoff::new(Duration::from_secs(1), Duration::from_secs(4));
/// assert_eq!(backoff.next_pause(), Duration::from_secs(1));
/// assert_eq!(backoff.next_pause(), Duration::from_secs(2));
/// assert_eq!(backoff.next_pause(), Duration::from_secs(4));
/// assert_eq!(backoff.next_pause(), Duration::from_secs(4));
/// backoff.reset();
/// assert_eq!(backoff.next_pause(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct PollBackoff {
    min: Duration,
    max: Duration,
    current: Duration,
}

impl PollBackoff {
    /// Create a backoff starting at `min`.
    pub fn new(min: Duration, max: Duration) -> Self {
        let max = max.max(min);
        Self {
            min,
            max,
            current: min,
        }
    }

    /// Return the pause to take now and double the next one.
    pub fn next_pause(&mut self) -> Duration {
        let pause = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        pause
    }

    /// Go back to the minimum pause.
    pub fn reset(&mut self) {
        self.current = self.min;
    }

    /// The pause the next dry poll will take.
    pub fn current(&self) -> Duration {
        self.current
    }
}

type Factory<T> = Box<dyn Fn(StreamPoll) -> ListingGenerator<T> + Send + Sync>;

enum State<T> {
    Idle,
    Polling(BoxFuture<'static, Result<Vec<T>>>),
    Sleeping(Pin<Box<tokio::time::Sleep>>),
}

/// An endless stream of items not seen before.
///
/// Each poll drains a fresh, bounded [`ListingGenerator`] from the factory,
/// reverses the page to oldest first and yields the unseen items. A poll that
/// yields nothing sleeps before the next one; the pause doubles from
/// `min_pause` up to `max_pause` and resets after any productive poll.
///
/// Errors from a poll are yielded as `Err`; polling again starts a new poll.
/// Dropping the stream cancels any pending sleep or request.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use reddit_rs::listing::StreamOptions;
///
/// # async fn example(client: reddit_rs::RedditClient) -> reddit_rs::Result<()> {
/// let mut comments = client
///     .subreddit("rust")
///     .stream()
///     .comments(StreamOptions::default().with_skip_existing(true))
///     .items();
///
/// while let Some(comment) = comments.next().await {
///     println!("{}", comment?.body);
/// }
/// # Ok(())
/// # }
/// ```
pub struct StreamGenerator<T> {
    factory: Factory<T>,
    options: StreamOptions,
    seen: BoundedSet<Fullname>,
    backoff: PollBackoff,
    buffer: VecDeque<T>,
    state: State<T>,
    before: Option<Cursor>,
    dry_streak: u32,
    cache_bust: usize,
    skip_next: bool,
    polls: usize,
}

impl<T: Listable> StreamGenerator<T> {
    /// Create a stream over a factory of newest-first listings.
    pub fn new<F>(factory: F, options: StreamOptions) -> Self
    where
        F: Fn(StreamPoll) -> ListingGenerator<T> + Send + Sync + 'static,
    {
        let mut seen = BoundedSet::new(options.cache_capacity);
        let before = options.continue_after_id.as_ref().map(|id| {
            seen.add(id.clone());
            Cursor::from(id)
        });

        Self {
            factory: Box::new(factory),
            backoff: PollBackoff::new(options.min_pause, options.max_pause),
            skip_next: options.skip_existing,
            options,
            seen,
            buffer: VecDeque::new(),
            state: State::Idle,
            before,
            dry_streak: 0,
            cache_bust: 0,
            polls: 0,
        }
    }

    /// Drop pause events and yield bare items.
    pub fn items(self) -> impl Stream<Item = Result<T>> + Send {
        self.try_filter_map(|event| futures_util::future::ready(Ok(event.into_item())))
    }

    fn next_poll(&mut self) -> StreamPoll {
        let mut limit = self.options.page_size.max(1);
        if self.before.is_none() {
            limit = limit.saturating_sub(self.cache_bust).max(1);
            self.cache_bust = (self.cache_bust + 1) % CACHE_BUST_CYCLE;
        }
        StreamPoll {
            limit,
            before: self.before.clone(),
        }
    }

    fn start_poll(&mut self) {
        let poll = self.next_poll();
        self.polls += 1;
        tracing::trace!(poll = self.polls, limit = poll.limit, before = ?poll.before, "polling stream");
        let listing = (self.factory)(poll);
        self.state = State::Polling(Box::pin(listing.try_collect::<Vec<T>>()));
    }

    /// Record a page; returns `true` if it held anything unseen.
    fn absorb(&mut self, mut items: Vec<T>) -> bool {
        items.reverse();

        let mut newest = None;
        for item in items {
            let name = item.fullname();
            let unseen = !self.seen.contains(&name);
            // Re-adding refreshes recency so repeat sightings stay cached.
            self.seen.add(name.clone());
            if !unseen {
                continue;
            }
            newest = Some(name);
            if !self.skip_next {
                self.buffer.push_back(item);
            }
        }
        self.skip_next = false;

        let found = newest.is_some();
        if self.options.exclude_before {
            if let Some(name) = newest {
                self.before = Some(Cursor::from(name));
            }
        }
        found
    }
}

impl<T> StreamGenerator<T> {
    /// Number of polls started so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Consecutive polls that found nothing new.
    pub fn dry_streak(&self) -> u32 {
        self.dry_streak
    }

    /// The pause the next dry poll will take.
    pub fn next_pause(&self) -> Duration {
        self.backoff.current()
    }

    /// Number of fullnames currently remembered.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}

impl<T: Listable> Stream for StreamGenerator<T> {
    type Item = Result<StreamEvent<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(StreamEvent::Item(item))));
            }

            match &mut this.state {
                State::Idle => this.start_poll(),
                State::Sleeping(sleep) => match sleep.as_mut().poll(cx) {
                    Poll::Ready(()) => this.state = State::Idle,
                    Poll::Pending => return Poll::Pending,
                },
                State::Polling(fut) => match fut.as_mut().poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Err(e)) => {
                        this.state = State::Idle;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Ready(Ok(items)) => {
                        this.state = State::Idle;

                        if this.absorb(items) {
                            this.dry_streak = 0;
                            this.backoff.reset();
                            continue;
                        }

                        this.dry_streak += 1;
                        if let Some(pause_after) = this.options.pause_after {
                            if this.dry_streak > pause_after {
                                this.dry_streak = 0;
                                this.backoff.reset();
                                return Poll::Ready(Some(Ok(StreamEvent::Pause)));
                            }
                        }

                        let pause = this.backoff.next_pause();
                        tracing::debug!(
                            dry_streak = this.dry_streak,
                            pause_ms = pause.as_millis() as u64,
                            "no new items; backing off"
                        );
                        if pause.is_zero() {
                            // Hand control back so a dry loop stays cancellable.
                            cx.waker().wake_by_ref();
                            return Poll::Pending;
                        }
                        this.state = State::Sleeping(Box::pin(tokio::time::sleep(pause)));
                    }
                },
            }
        }
    }
}

impl<T> Unpin for StreamGenerator<T> {}

impl<T> std::fmt::Debug for StreamGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamGenerator")
            .field("options", &self.options)
            .field("before", &self.before)
            .field("polls", &self.polls)
            .field("dry_streak", &self.dry_streak)
            .field("seen", &self.seen.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{Page, PageRequest};
    use crate::models::Kind;
    use futures_util::StreamExt;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(String);

    impl Listable for Item {
        fn from_thing(_kind: &str, data: Value) -> Result<Self> {
            Ok(Item(data["id"].as_str().unwrap_or_default().to_string()))
        }

        fn fullname(&self) -> Fullname {
            Fullname::new(Kind::Link, &self.0)
        }
    }

    /// A newest-first feed that records every poll.
    #[derive(Clone, Default)]
    struct Feed {
        items: Arc<Mutex<Vec<String>>>,
        polls: Arc<Mutex<Vec<(Instant, StreamPoll)>>>,
    }

    impl Feed {
        fn with_range(count: usize) -> Self {
            let feed = Feed::default();
            for i in 0..count {
                feed.publish(&i.to_string());
            }
            feed
        }

        fn publish(&self, id: &str) {
            self.items.lock().unwrap().insert(0, id.to_string());
        }

        fn polls(&self) -> Vec<(Instant, StreamPoll)> {
            self.polls.lock().unwrap().clone()
        }

        fn factory(&self) -> impl Fn(StreamPoll) -> ListingGenerator<Item> + Send + Sync + 'static {
            let feed = self.clone();
            move |poll: StreamPoll| {
                feed.polls.lock().unwrap().push((Instant::now(), poll.clone()));
                let snapshot = feed.items.lock().unwrap().clone();
                let before = poll.before.clone();
                ListingGenerator::new(move |request: PageRequest| {
                    let items: Vec<Item> = snapshot
                        .iter()
                        .take_while(|id| {
                            before.as_ref().map_or(true, |b| {
                                b.as_str() != Fullname::new(Kind::Link, id.as_str()).as_str()
                            })
                        })
                        .take(request.limit)
                        .map(|id| Item(id.clone()))
                        .collect();
                    Box::pin(async move { Ok(Page::new(items, None)) })
                        as BoxFuture<'static, Result<Page<Item>>>
                })
                .with_limit(Some(poll.limit))
                .with_page_size(poll.limit)
            }
        }
    }

    async fn take_until_pause(stream: &mut StreamGenerator<Item>) -> Vec<Item> {
        let mut items = Vec::new();
        while let Some(event) = stream.next().await {
            match event.unwrap() {
                StreamEvent::Item(item) => items.push(item),
                StreamEvent::Pause => break,
            }
        }
        items
    }

    #[tokio::test]
    async fn test_unchanged_window_yields_nothing_new() {
        let feed = Feed::with_range(100);
        let options = StreamOptions::default().with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        let first = take_until_pause(&mut stream).await;
        let expected: Vec<Item> = (0..100).map(|i| Item(i.to_string())).collect();
        assert_eq!(first, expected, "first poll yields the window oldest first");

        let second = take_until_pause(&mut stream).await;
        assert!(second.is_empty());
        assert_eq!(feed.polls().len(), 3);
    }

    #[tokio::test]
    async fn test_only_new_items_after_publish() {
        let feed = Feed::with_range(5);
        let options = StreamOptions::default().with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        assert_eq!(take_until_pause(&mut stream).await.len(), 5);
        feed.publish("new-1");
        feed.publish("new-2");
        let next = take_until_pause(&mut stream).await;
        assert_eq!(next, vec![Item("new-1".into()), Item("new-2".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_polls_back_off_and_reset() {
        let feed = Feed::with_range(3);
        let options = StreamOptions::default()
            .with_min_pause(Duration::from_secs(1))
            .with_max_pause(Duration::from_secs(4));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        for _ in 0..3 {
            stream.next().await.unwrap().unwrap();
        }

        // Publish from inside the feed after five dry polls.
        let publisher = feed.clone();
        let watcher = tokio::spawn(async move {
            loop {
                if publisher.polls().len() >= 6 {
                    publisher.publish("late");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });

        let late = stream.next().await.unwrap().unwrap();
        assert_eq!(late, StreamEvent::Item(Item("late".into())));
        watcher.await.unwrap();

        // After the productive poll the next dry pause starts over.
        assert_eq!(stream.next_pause(), Duration::from_secs(1));
        let _ = tokio::time::timeout(Duration::from_millis(1500), stream.next()).await;

        let polls = feed.polls();
        let gaps: Vec<Duration> = polls
            .windows(2)
            .map(|w| w[1].0.duration_since(w[0].0))
            .collect();

        // Gaps between dry polls never shrink and never exceed the ceiling.
        let dry = &gaps[1..5];
        for pair in dry.windows(2) {
            assert!(pair[1] >= pair[0], "pauses must be non-decreasing: {dry:?}");
        }
        assert!(dry.iter().all(|g| *g <= Duration::from_secs(4) + Duration::from_millis(100)));
        assert!(gaps[1] >= Duration::from_secs(1));
        assert!(gaps[2] >= Duration::from_secs(2));

        // The first dry poll after "late" waits only the minimum again.
        let after_late = polls.len() - 1;
        let reset_gap = polls[after_late].0.duration_since(polls[after_late - 1].0);
        assert!(reset_gap < Duration::from_secs(2), "pause reset to minimum, got {reset_gap:?}");
    }

    #[test]
    fn test_backoff_is_bounded_and_non_decreasing() {
        let mut backoff = PollBackoff::new(Duration::from_secs(1), Duration::from_secs(16));
        let mut last = Duration::ZERO;
        for _ in 0..20 {
            let pause = backoff.next_pause();
            assert!(pause >= last);
            assert!(pause <= Duration::from_secs(16));
            last = pause;
        }
        assert_eq!(last, Duration::from_secs(16));
    }

    #[test]
    fn test_zero_min_pause_never_sleeps() {
        let mut backoff = PollBackoff::new(Duration::ZERO, Duration::from_secs(16));
        for _ in 0..5 {
            assert!(backoff.next_pause().is_zero());
        }
    }

    #[tokio::test]
    async fn test_zero_pause_dry_polls_can_be_cancelled() {
        let feed = Feed::with_range(1);
        let options = StreamOptions::default().with_min_pause(Duration::ZERO);
        let mut stream = StreamGenerator::new(feed.factory(), options);

        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            StreamEvent::Item(Item("0".into()))
        );
        let waited = tokio::time::timeout(Duration::from_millis(200), stream.next()).await;
        assert!(waited.is_err(), "no new items, so the timeout must win");
        assert!(feed.polls().len() > 2, "dry polls continue without sleeping");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_after_sleeps_through_dry_polls_first() {
        let feed = Feed::with_range(1);
        let options = StreamOptions::default()
            .with_min_pause(Duration::from_secs(1))
            .with_pause_after(Some(2));
        let mut stream = StreamGenerator::new(feed.factory(), options);
        let start = Instant::now();

        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            StreamEvent::Item(Item("0".into()))
        );

        // Two dry polls sleep 1s then 2s; the third emits the pause.
        assert_eq!(stream.next().await.unwrap().unwrap(), StreamEvent::Pause);
        assert_eq!(feed.polls().len(), 4);
        assert_eq!(stream.dry_streak(), 0);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");

        // The streak and the pause both start over.
        assert_eq!(stream.next_pause(), Duration::from_secs(1));
        assert_eq!(stream.next().await.unwrap().unwrap(), StreamEvent::Pause);
        assert_eq!(feed.polls().len(), 7);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(7), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_skip_existing_yields_only_later_items() {
        let feed = Feed::with_range(10);
        let options = StreamOptions::default()
            .with_skip_existing(true)
            .with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        assert!(take_until_pause(&mut stream).await.is_empty());
        feed.publish("fresh");
        assert_eq!(take_until_pause(&mut stream).await, vec![Item("fresh".into())]);
    }

    #[tokio::test]
    async fn test_continue_after_id_anchors_polls() {
        let feed = Feed::with_range(6);
        let options = StreamOptions::default()
            .with_continue_after(Fullname::new(Kind::Link, "3"))
            .with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        let items = take_until_pause(&mut stream).await;
        assert_eq!(items, vec![Item("4".into()), Item("5".into())]);
        let (_, first_poll) = &feed.polls()[0];
        assert_eq!(first_poll.before, Some(Cursor::new("t3_3")));
        assert_eq!(first_poll.limit, DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_exclude_before_moves_anchor() {
        let feed = Feed::with_range(3);
        let options = StreamOptions::default()
            .with_exclude_before(true)
            .with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        take_until_pause(&mut stream).await;
        let polls = feed.polls();
        assert_eq!(polls[1].1.before, Some(Cursor::new("t3_2")));
    }

    #[tokio::test]
    async fn test_cache_busting_varies_limit_without_anchor() {
        let feed = Feed::with_range(1);
        let options = StreamOptions::default().with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        for _ in 0..3 {
            take_until_pause(&mut stream).await;
        }
        let limits: Vec<usize> = feed.polls().iter().map(|(_, p)| p.limit).collect();
        assert_eq!(&limits[..4], &[100, 99, 98, 97]);
    }

    #[tokio::test]
    async fn test_undersized_cache_can_yield_duplicates() {
        // Documented trade-off: a window larger than the cache thrashes it.
        let feed = Feed::with_range(3);
        let options = StreamOptions::default()
            .with_cache_capacity(2)
            .with_pause_after(Some(0));
        let mut stream = StreamGenerator::new(feed.factory(), options);

        let mut items = Vec::new();
        for _ in 0..4 {
            match stream.next().await.unwrap().unwrap() {
                StreamEvent::Item(item) => items.push(item),
                StreamEvent::Pause => panic!("unexpected pause"),
            }
        }
        assert_eq!(items[0], Item("0".into()));
        assert_eq!(items[3], Item("0".into()), "evicted item is yielded again");
    }

    #[tokio::test]
    async fn test_poll_error_is_surfaced_then_polling_continues() {
        let attempts = Arc::new(Mutex::new(0usize));
        let counter = attempts.clone();
        let factory = move |poll: StreamPoll| {
            let call = {
                let mut n = counter.lock().unwrap();
                *n += 1;
                *n
            };
            ListingGenerator::new(move |_request: PageRequest| {
                Box::pin(async move {
                    if call == 1 {
                        Err(crate::Error::Transport("reset by peer".into()))
                    } else {
                        Ok(Page::new(vec![Item("x".into())], None))
                    }
                }) as BoxFuture<'static, Result<Page<Item>>>
            })
            .with_limit(Some(poll.limit))
        };
        let mut stream = StreamGenerator::new(factory, StreamOptions::default());

        assert!(stream.next().await.unwrap().is_err());
        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(event, StreamEvent::Item(Item("x".into())));
        assert_eq!(*attempts.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_items_adapter_drops_pauses() {
        let feed = Feed::with_range(2);
        let options = StreamOptions::default().with_pause_after(Some(0));
        let stream = StreamGenerator::new(feed.factory(), options);

        let items: Vec<Item> = stream
            .items()
            .take(2)
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(items, vec![Item("0".into()), Item("1".into())]);
    }
}
