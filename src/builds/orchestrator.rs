use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{BuildLensError, Result};

use super::builder::BuildAggregateBuilder;
use super::types::{Build, BuildFilter};

/// One page request against the builds store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
    pub filter: BuildFilter,
    pub user_id: u64,
}

/// Backing store of raw ingestion records.
///
/// Returns undecoded documents so that one broken record fails only itself.
#[async_trait]
pub trait BuildSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>>;
}

/// Result of one page fetch.
#[derive(Debug)]
pub struct PageReport {
    /// Number of builds appended to the feed
    pub appended: usize,
    /// Records omitted from the page and why
    pub failures: Vec<BuildLensError>,
    /// Whether another page is believed to exist
    pub has_more: bool,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(PageReport),
    /// Another fetch is in flight; nothing was requested.
    InFlight,
    /// The last page was already reached; call `reset` to start over.
    Exhausted,
}

/// Point-in-time copy of the feed.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub items: Vec<Build>,
    pub offset: usize,
    pub has_more: bool,
}

#[derive(Debug)]
struct FeedState {
    items: Vec<Build>,
    offset: usize,
    has_more: bool,
}

impl FeedState {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
        }
    }
}

/// Clears the in-flight flag however the fetch ends, including when the
/// future is dropped mid-way.
struct FetchingGuard<'a>(&'a AtomicBool);

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Paginates raw records out of a [`BuildSource`] into an ordered feed of builds.
///
/// Each page is built concurrently, sorted by descending id and appended to
/// the feed as one unit. Pages are never merged or re-sorted against earlier
/// pages.
pub struct BuildFetchOrchestrator<S> {
    source: S,
    builder: BuildAggregateBuilder,
    page_size: usize,
    filter: BuildFilter,
    subject_user_id: u64,
    clock: fn() -> i64,
    fetching: AtomicBool,
    state: Mutex<FeedState>,
}

impl<S: BuildSource> BuildFetchOrchestrator<S> {
    /// # Errors
    ///
    /// Returns a configuration error when `page_size` is zero.
    pub fn new(
        source: S,
        builder: BuildAggregateBuilder,
        page_size: usize,
        filter: BuildFilter,
        subject_user_id: u64,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(BuildLensError::Config("page size must be at least 1".to_string()));
        }

        Ok(Self {
            source,
            builder,
            page_size,
            filter,
            subject_user_id,
            clock: unix_now,
            fetching: AtomicBool::new(false),
            state: Mutex::new(FeedState::new()),
        })
    }

    /// Replaces the wall clock (Unix seconds) used for running build durations.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn filter(&self) -> BuildFilter {
        self.filter
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// Switches the filter and starts the feed over.
    pub fn set_filter(&mut self, filter: BuildFilter) {
        self.filter = filter;
        self.reset();
    }

    /// Switches the user whose builds are listed and starts the feed over.
    pub fn set_subject_user(&mut self, user_id: u64) {
        self.subject_user_id = user_id;
        self.reset();
    }

    /// Drops all fetched builds and rewinds to the first page.
    pub fn reset(&mut self) {
        *self.state.get_mut() = FeedState::new();
    }

    /// Offset the next page will be requested from.
    pub async fn offset(&self) -> usize {
        self.state.lock().await.offset
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let state = self.state.lock().await;
        FeedSnapshot {
            items: state.items.clone(),
            offset: state.offset,
            has_more: state.has_more,
        }
    }

    /// Fetches, builds and appends the next page.
    ///
    /// A call made while another is in flight returns [`FetchOutcome::InFlight`]
    /// without touching the store. Records that fail to build are left out of
    /// the feed and listed in the report; they never abort the rest of the page.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the page itself cannot be retrieved.
    /// The feed and offset are left unchanged so the call can be retried.
    pub async fn fetch_next_page(&self) -> Result<FetchOutcome> {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Page fetch already in flight, ignoring request");
            return Ok(FetchOutcome::InFlight);
        }
        let _guard = FetchingGuard(&self.fetching);

        let (offset, has_more) = {
            let state = self.state.lock().await;
            (state.offset, state.has_more)
        };

        if !has_more {
            debug!("No more pages to fetch");
            return Ok(FetchOutcome::Exhausted);
        }

        let request = PageRequest {
            limit: self.page_size,
            offset,
            filter: self.filter,
            user_id: self.subject_user_id,
        };

        info!(
            "Fetching {} builds at offset {} (filter: {})...",
            request.limit,
            request.offset,
            request.filter.as_str()
        );

        let documents = self.source.fetch_page(&request).await?;
        let record_count = documents.len();
        let now = (self.clock)();

        let results = join_all(
            documents
                .into_iter()
                .map(|document| self.builder.build(document, now)),
        )
        .await;

        let mut builds = Vec::with_capacity(record_count);
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(build) => builds.push(build),
                Err(e) => {
                    warn!("Omitting build from page: {e}");
                    failures.push(e);
                }
            }
        }

        builds.sort_by(|a, b| b.id.cmp(&a.id));

        let has_more = record_count == self.page_size;
        let appended = builds.len();

        {
            let mut state = self.state.lock().await;
            state.items.extend(builds);
            state.has_more = has_more;
            if has_more {
                state.offset += self.page_size;
            }
        }

        info!(
            "Processed {record_count} records: {appended} builds, {} omitted",
            failures.len()
        );

        Ok(FetchOutcome::Fetched(PageReport {
            appended,
            failures,
            has_more,
        }))
    }
}
