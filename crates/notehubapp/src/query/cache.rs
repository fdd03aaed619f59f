use super::key::QueryKey;
use crate::error::NotehubError;
use crate::model::NotesPage;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEventKind {
    Fetching,
    Updated,
    Failed,
    Invalidated,
}

/// Change notification for one key, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEvent {
    pub key: QueryKey,
    pub kind: QueryEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Last successfully fetched page, kept across invalidations and errors
    pub data: Option<NotesPage>,
    /// Error of the last completed fetch, cleared when a new fetch starts
    pub error: Option<NotehubError>,
    pub fetching: bool,
    pub fetched_at: Option<Instant>,
    pub invalidated: bool,
    generation: u64,
    /// Generation of the most recently started fetch
    fetch_generation: u64,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            data: None,
            error: None,
            fetching: false,
            fetched_at: None,
            invalidated: false,
            generation: 0,
            fetch_generation: 0,
        }
    }

    /// Bumped by every invalidation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the entry may be served without a network call.
    pub fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        if self.invalidated || self.error.is_some() || self.data.is_none() {
            return false;
        }
        self.fetched_at
            .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
    }
}

/// Store of notes pages keyed by [`QueryKey`].
///
/// Created once per session and dropped with it. Entries are never removed;
/// the key space (pages × search terms actually visited) bounds its size.
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    events: broadcast::Sender<QueryEvent>,
}

impl Default for QueryCache {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: HashMap::new(),
            events,
        }
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Stores `page` as fresh data for `key`.
    pub fn set(&mut self, key: &QueryKey, page: NotesPage, now: Instant) {
        let generation = self.entry(key).generation;
        self.complete_fetch(key, Ok(page), now, generation);
    }

    /// Marks `key` as fetching and returns the generation the fetch started at.
    pub fn begin_fetch(&mut self, key: &QueryKey) -> u64 {
        let entry = self.entry(key);
        entry.fetching = true;
        entry.error = None;
        let generation = entry.generation;
        entry.fetch_generation = generation;
        self.emit(key, QueryEventKind::Fetching);
        generation
    }

    /// Records the outcome of a fetch that started at `generation`.
    ///
    /// If the entry was invalidated while the fetch was in flight, the data is
    /// kept but the entry stays invalidated. If a newer fetch has started since,
    /// the outcome is dropped and `false` is returned.
    pub fn complete_fetch(
        &mut self,
        key: &QueryKey,
        outcome: Result<NotesPage, NotehubError>,
        now: Instant,
        generation: u64,
    ) -> bool {
        let entry = self.entry(key);
        if generation < entry.fetch_generation {
            return false;
        }
        entry.fetching = false;
        let kind = match outcome {
            Ok(page) => {
                entry.data = Some(page);
                entry.error = None;
                entry.fetched_at = Some(now);
                entry.invalidated = entry.generation != generation;
                QueryEventKind::Updated
            }
            Err(error) => {
                entry.error = Some(error);
                QueryEventKind::Failed
            }
        };
        self.emit(key, kind);
        true
    }

    /// Marks every entry whose key satisfies `predicate` as invalidated.
    /// Data is kept. Returns the number of entries affected.
    pub fn invalidate<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&QueryKey) -> bool,
    {
        let mut touched = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            if predicate(key) {
                entry.invalidated = true;
                entry.generation += 1;
                touched.push(key.clone());
            }
        }
        for key in &touched {
            self.emit(key, QueryEventKind::Invalidated);
        }
        touched.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.events.subscribe()
    }

    /// A copy of every entry, for inspection.
    pub fn snapshot(&self) -> HashMap<QueryKey, CacheEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, key: &QueryKey) -> &mut CacheEntry {
        self.entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::new)
    }

    fn emit(&self, key: &QueryKey, kind: QueryEventKind) {
        // no subscribers is fine
        let _ = self.events.send(QueryEvent {
            key: key.clone(),
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::key::NOTES_NAMESPACE;

    const FIVE_MIN: Duration = Duration::from_secs(300);

    fn page(total: u32) -> NotesPage {
        NotesPage {
            notes: Vec::new(),
            total_pages: total,
        }
    }

    #[test]
    fn set_entry_is_fresh_within_window() {
        let mut cache = QueryCache::new();
        let key = QueryKey::notes(1, "");
        let now = Instant::now();
        cache.set(&key, page(1), now);

        let entry = cache.get(&key).unwrap();
        assert!(entry.is_fresh(now + Duration::from_secs(299), FIVE_MIN));
        assert!(!entry.is_fresh(now + FIVE_MIN, FIVE_MIN));
    }

    #[test]
    fn invalidate_keeps_data_but_forces_refetch() {
        let mut cache = QueryCache::new();
        let now = Instant::now();
        let a = QueryKey::notes(1, "");
        let b = QueryKey::notes(2, "tea");
        cache.set(&a, page(2), now);
        cache.set(&b, page(1), now);

        let count = cache.invalidate(|k| k.is_in(NOTES_NAMESPACE));
        assert_eq!(count, 2);

        let entry = cache.get(&a).unwrap();
        assert_eq!(entry.data, Some(page(2)));
        assert!(!entry.is_fresh(now, FIVE_MIN));
    }

    #[test]
    fn invalidate_respects_predicate() {
        let mut cache = QueryCache::new();
        let now = Instant::now();
        let a = QueryKey::notes(1, "");
        let b = QueryKey::notes(1, "tea");
        cache.set(&a, page(1), now);
        cache.set(&b, page(1), now);

        assert_eq!(cache.invalidate(|k| k.search() == "tea"), 1);
        assert!(cache.get(&a).unwrap().is_fresh(now, FIVE_MIN));
        assert!(cache.get(&b).unwrap().invalidated);
    }

    #[test]
    fn invalidation_during_fetch_keeps_entry_stale() {
        let mut cache = QueryCache::new();
        let key = QueryKey::notes(1, "");
        let now = Instant::now();

        let generation = cache.begin_fetch(&key);
        cache.invalidate(|_| true);
        cache.complete_fetch(&key, Ok(page(1)), now, generation);

        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.data, Some(page(1)));
        assert!(entry.invalidated);
        assert!(!entry.is_fresh(now, FIVE_MIN));
    }

    #[test]
    fn outcome_of_superseded_fetch_is_dropped() {
        let mut cache = QueryCache::new();
        let key = QueryKey::notes(1, "");
        let now = Instant::now();

        let old = cache.begin_fetch(&key);
        cache.invalidate(|_| true);
        let new = cache.begin_fetch(&key);
        assert!(cache.complete_fetch(&key, Ok(page(2)), now, new));
        assert!(!cache.complete_fetch(&key, Ok(page(1)), now, old));

        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.data, Some(page(2)));
        assert!(!entry.invalidated);
        assert!(entry.is_fresh(now, FIVE_MIN));
    }

    #[test]
    fn failed_fetch_keeps_previous_data() {
        let mut cache = QueryCache::new();
        let key = QueryKey::notes(1, "");
        let now = Instant::now();
        cache.set(&key, page(3), now);

        let generation = cache.begin_fetch(&key);
        cache.complete_fetch(
            &key,
            Err(NotehubError::Network("offline".into())),
            now,
            generation,
        );

        let entry = cache.get(&key).unwrap();
        assert_eq!(entry.data, Some(page(3)));
        assert!(entry.error.is_some());
        assert!(!entry.fetching);
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let mut cache = QueryCache::new();
        let mut events = cache.subscribe();
        let key = QueryKey::notes(1, "");

        let generation = cache.begin_fetch(&key);
        cache.complete_fetch(&key, Ok(page(1)), Instant::now(), generation);
        cache.invalidate(|_| true);

        let kinds: Vec<QueryEventKind> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                QueryEventKind::Fetching,
                QueryEventKind::Updated,
                QueryEventKind::Invalidated
            ]
        );
    }
}
