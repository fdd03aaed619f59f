use super::NotesTransport;
use crate::error::{NotehubError, Result};
use crate::model::{ListParams, NewNote, Note, NotesPage};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
struct State {
    /// Newest first, as the API returns them.
    notes: Vec<Note>,
    list_history: Vec<ListParams>,
    create_calls: usize,
    delete_calls: usize,
    fail_next_list: Option<NotehubError>,
    fail_next_create: Option<NotehubError>,
    fail_next_delete: Option<NotehubError>,
    latency: Duration,
    page_latency: HashMap<u32, Duration>,
}

/// In-memory notes server for testing.
///
/// Behaves like the API: case-insensitive search over title and content,
/// `perPage`-sized pages, server-assigned ids. Failures are injected one call
/// at a time and latency is simulated with `tokio::time::sleep`, so tests that
/// pause the tokio clock stay deterministic.
#[derive(Default)]
pub struct InMemoryTransport {
    state: Mutex<State>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with `notes`, first element listed first.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let transport = Self::new();
        transport.state.lock().notes = notes;
        transport
    }

    /// Seeds `count` notes titled `Note 1` to `Note {count}`; the last one is listed first.
    pub fn with_generated(count: usize) -> Self {
        let transport = Self::new();
        for i in 1..=count {
            transport.insert(NewNote::new(
                format!("Note {}", i),
                format!("Body {}", i),
                Default::default(),
            ));
        }
        transport
    }

    /// Stores a note directly, bypassing call counters.
    pub fn insert(&self, note: NewNote) -> Note {
        let now = Utc::now();
        let stored = Note {
            id: Uuid::new_v4().simple().to_string(),
            title: note.title,
            content: note.content,
            tag: note.tag,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.state.lock().notes.insert(0, stored.clone());
        stored
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// Latency for list calls of one page, overriding the default latency.
    pub fn set_page_latency(&self, page: u32, latency: Duration) {
        self.state.lock().page_latency.insert(page, latency);
    }

    pub fn fail_next_list(&self, error: NotehubError) {
        self.state.lock().fail_next_list = Some(error);
    }

    pub fn fail_next_create(&self, error: NotehubError) {
        self.state.lock().fail_next_create = Some(error);
    }

    pub fn fail_next_delete(&self, error: NotehubError) {
        self.state.lock().fail_next_delete = Some(error);
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_history.len()
    }

    /// Parameters of every list call, in issue order.
    pub fn list_history(&self) -> Vec<ListParams> {
        self.state.lock().list_history.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().create_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().delete_calls
    }

    fn latency_for(&self, page: u32) -> Duration {
        let state = self.state.lock();
        state.page_latency.get(&page).copied().unwrap_or(state.latency)
    }

    async fn simulate_latency(&self, page: u32) {
        let latency = self.latency_for(page);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

fn matches_search(note: &Note, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}

fn total_pages(matched: usize, per_page: usize) -> u32 {
    matched.div_ceil(per_page) as u32
}

fn list_page(notes: &[Note], params: &ListParams) -> NotesPage {
    let needle = params.search.to_lowercase();
    let per_page = params.per_page.max(1) as usize;
    let matched: Vec<&Note> = notes
        .iter()
        .filter(|n| matches_search(n, &needle))
        .collect();

    let skip = (params.page.max(1) as usize - 1) * per_page;
    NotesPage {
        notes: matched.iter().skip(skip).take(per_page).map(|n| (*n).clone()).collect(),
        total_pages: total_pages(matched.len(), per_page),
    }
}

#[async_trait]
impl NotesTransport for InMemoryTransport {
    async fn list_notes(&self, params: &ListParams) -> Result<NotesPage> {
        // the page reflects the store when the request arrives, not when it returns
        let response = {
            let mut state = self.state.lock();
            state.list_history.push(params.clone());
            match state.fail_next_list.take() {
                Some(error) => Err(error),
                None => Ok(list_page(&state.notes, params)),
            }
        };
        self.simulate_latency(params.page).await;
        response
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let failure = {
            let mut state = self.state.lock();
            state.create_calls += 1;
            state.fail_next_create.take()
        };
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(self.insert(note.clone()))
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let mut state = self.state.lock();
        state.delete_calls += 1;
        if let Some(error) = state.fail_next_delete.take() {
            return Err(error);
        }

        let position = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NotehubError::NotFound(id.to_string()))?;
        Ok(state.notes.remove(position))
    }
}
