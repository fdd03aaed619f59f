//! Fetch orchestration over the query cache.
//!
//! `resolve` serves fresh entries from the cache and otherwise issues one list
//! call per key. Concurrent resolves of a key that is already loading await the
//! same shared future, so the transport sees a single request. The shared
//! future records its own outcome in the cache, which is why every waiter can
//! simply read the cache once it completes.
//!
//! A fetch is only joined if it started at the entry's current generation. Once
//! an invalidation bumps the generation, the next `resolve` starts a new
//! request; the older one's outcome is dropped when it lands, and anyone still
//! waiting on it moves over to the newer fetch.

use super::cache::{CacheEntry, QueryCache, QueryEvent};
use super::key::QueryKey;
use crate::error::{NotehubError, Result};
use crate::model::NotesPage;
use crate::transport::NotesTransport;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant};

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

type SharedFetch = Shared<BoxFuture<'static, Result<NotesPage>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Loading,
    Success,
    Error,
}

/// What a view should render for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub key: QueryKey,
    pub status: QueryStatus,
    pub data: Option<NotesPage>,
    pub error: Option<NotehubError>,
    /// `data` belongs to a different key and is shown while this one loads
    pub is_placeholder: bool,
    pub is_fetching: bool,
}

#[derive(Default)]
struct State {
    cache: QueryCache,
    /// Running fetches with the generation they started at
    in_flight: HashMap<QueryKey, (u64, SharedFetch)>,
    last_success: Option<(QueryKey, NotesPage)>,
}

pub struct FetchOrchestrator {
    transport: Arc<dyn NotesTransport>,
    state: Arc<Mutex<State>>,
    per_page: u32,
    stale_time: Duration,
}

impl FetchOrchestrator {
    pub fn new(transport: Arc<dyn NotesTransport>) -> Self {
        Self::with_options(transport, DEFAULT_PER_PAGE, DEFAULT_STALE_TIME)
    }

    pub fn with_options(
        transport: Arc<dyn NotesTransport>,
        per_page: u32,
        stale_time: Duration,
    ) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(State::default())),
            per_page: per_page.max(1),
            stale_time,
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Returns the state of `key`, fetching first unless the cached entry is fresh.
    pub async fn resolve(&self, key: &QueryKey) -> QueryResult {
        loop {
            let fetch = {
                let mut state = self.state.lock();
                let now = Instant::now();
                let current = match state.cache.get(key) {
                    Some(entry) if entry.is_fresh(now, self.stale_time) => {
                        debug!("cache hit for {}", key);
                        return snapshot(&state, key);
                    }
                    Some(entry) => entry.generation(),
                    None => 0,
                };

                let joinable = state
                    .in_flight
                    .get(key)
                    .filter(|(started, _)| *started == current)
                    .map(|(_, pending)| pending.clone());
                match joinable {
                    Some(pending) => {
                        debug!("joining in-flight fetch for {}", key);
                        pending
                    }
                    None => self.start_fetch(&mut state, key),
                }
            };

            // The outcome is already recorded in the cache by the fetch itself.
            let _ = fetch.await;

            {
                let state = self.state.lock();
                if !state.in_flight.contains_key(key) {
                    return snapshot(&state, key);
                }
            }
            debug!("fetch of {} was superseded, waiting for the newer one", key);
        }
    }

    /// Current state of `key` without fetching.
    ///
    /// A key with no data of its own reports `Loading` and, if any other key
    /// has loaded successfully, carries that page as placeholder data.
    pub fn peek(&self, key: &QueryKey) -> QueryResult {
        let state = self.state.lock();
        snapshot(&state, key)
    }

    /// Marks matching entries stale so the next `resolve` refetches them.
    pub fn invalidate<F>(&self, predicate: F) -> usize
    where
        F: Fn(&QueryKey) -> bool,
    {
        let count = self.state.lock().cache.invalidate(predicate);
        debug!("invalidated {} cached queries", count);
        count
    }

    pub fn invalidate_namespace(&self, namespace: &str) -> usize {
        self.invalidate(|key| key.is_in(namespace))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.state.lock().cache.subscribe()
    }

    /// A copy of every cache entry.
    pub fn entries(&self) -> HashMap<QueryKey, CacheEntry> {
        self.state.lock().cache.snapshot()
    }

    pub fn entry(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.state.lock().cache.get(key).cloned()
    }

    fn start_fetch(&self, state: &mut State, key: &QueryKey) -> SharedFetch {
        debug!("fetching {}", key);
        let generation = state.cache.begin_fetch(key);
        let transport = Arc::clone(&self.transport);
        let shared_state = Arc::clone(&self.state);
        let params = key.to_params(self.per_page);
        let owned_key = key.clone();

        let fetch = async move {
            let outcome = transport.list_notes(&params).await;
            {
                let mut state = shared_state.lock();
                if matches!(state.in_flight.get(&owned_key), Some((started, _)) if *started == generation)
                {
                    state.in_flight.remove(&owned_key);
                }
                let recorded = state.cache.complete_fetch(
                    &owned_key,
                    outcome.clone(),
                    Instant::now(),
                    generation,
                );
                match &outcome {
                    Ok(page) if recorded => {
                        state.last_success = Some((owned_key.clone(), page.clone()));
                    }
                    Ok(_) => debug!("dropping superseded response for {}", owned_key),
                    Err(e) => warn!("fetch of {} failed: {}", owned_key, e),
                }
            }
            outcome
        }
        .boxed()
        .shared();

        state
            .in_flight
            .insert(key.clone(), (generation, fetch.clone()));
        fetch
    }
}

fn snapshot(state: &State, key: &QueryKey) -> QueryResult {
    let entry = state.cache.get(key);
    let is_fetching = entry.is_some_and(|e| e.fetching);

    if let Some(entry) = entry {
        if let Some(error) = &entry.error {
            return QueryResult {
                key: key.clone(),
                status: QueryStatus::Error,
                data: entry.data.clone(),
                error: Some(error.clone()),
                is_placeholder: false,
                is_fetching,
            };
        }
        if let Some(data) = &entry.data {
            return QueryResult {
                key: key.clone(),
                status: QueryStatus::Success,
                data: Some(data.clone()),
                error: None,
                is_placeholder: false,
                is_fetching,
            };
        }
    }

    let placeholder = state
        .last_success
        .as_ref()
        .filter(|(k, _)| k != key)
        .map(|(_, page)| page.clone());

    QueryResult {
        key: key.clone(),
        status: QueryStatus::Loading,
        is_placeholder: placeholder.is_some(),
        data: placeholder,
        error: None,
        is_fetching,
    }
}
