//! # Session Facade
//!
//! [`NotesSession`] is the single entry point for a notes screen, regardless of
//! the UI drawing it. It owns the transient UI state (current page, search text,
//! modal flag) and wires it to the coordination layer.
//!
//! ## Role and Responsibilities
//!
//! The session:
//! - **Derives** the current [`QueryKey`] from page and debounced search
//! - **Resets** to page 1 whenever the debounced search text changes
//! - **Guards** against late responses: a result is applied only if its key is
//!   still the current key, whatever order responses arrive in
//! - **Validates** forms before anything reaches the mutation coordinator
//! - **Returns** a [`NotesView`] describing what to render
//!
//! ## What the Session Does NOT Do
//!
//! - **Caching policy**: That belongs to [`FetchOrchestrator`]
//! - **Rendering**: A client turns `NotesView` into pixels or terminal lines
//! - **Timers**: The caller decides when to poll the debounce (or awaits
//!   [`NotesSession::settle_search`])

use crate::config::NotehubConfig;
use crate::debounce::{SearchDebounce, DEFAULT_DEBOUNCE};
use crate::error::{NotehubError, Result};
use crate::form::NoteForm;
use crate::model::Note;
use crate::mutation::{ModalState, MutationCoordinator};
use crate::notify::Notifier;
use crate::query::orchestrator::{DEFAULT_PER_PAGE, DEFAULT_STALE_TIME};
use crate::query::{FetchOrchestrator, QueryEvent, QueryKey, QueryResult, QueryStatus};
use crate::transport::NotesTransport;
use log::debug;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub per_page: u32,
    pub stale_time: Duration,
    pub debounce: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            stale_time: DEFAULT_STALE_TIME,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&NotehubConfig> for SessionOptions {
    fn from(config: &NotehubConfig) -> Self {
        Self {
            per_page: config.per_page(),
            stale_time: config.stale_time(),
            debounce: config.debounce(),
        }
    }
}

/// Everything a notes screen needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesView {
    pub status: QueryStatus,
    pub notes: Vec<Note>,
    pub total_pages: u32,
    pub current_page: u32,
    /// Pagination controls are only drawn when there is more than one page
    pub show_pagination: bool,
    pub is_placeholder: bool,
    pub error: Option<NotehubError>,
    pub search: String,
}

pub struct NotesSession {
    queries: Arc<FetchOrchestrator>,
    mutations: MutationCoordinator,
    search: SearchDebounce,
    current_page: u32,
    modal: ModalState,
    displayed: Option<QueryResult>,
}

impl NotesSession {
    pub fn new(
        transport: Arc<dyn NotesTransport>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Self {
        let queries = Arc::new(FetchOrchestrator::with_options(
            Arc::clone(&transport),
            options.per_page,
            options.stale_time,
        ));
        let mutations = MutationCoordinator::new(transport, Arc::clone(&queries), notifier);
        Self {
            queries,
            mutations,
            search: SearchDebounce::new(options.debounce),
            current_page: 1,
            modal: ModalState::new(),
            displayed: None,
        }
    }

    pub fn from_config(
        config: &NotehubConfig,
        transport: Arc<dyn NotesTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(transport, notifier, SessionOptions::from(config))
    }

    pub fn queries(&self) -> &Arc<FetchOrchestrator> {
        &self.queries
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::notes(self.current_page, self.search.debounced())
    }

    // --- Pagination ---

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Moves forward if the current key's own data reports a later page.
    /// Placeholder data from another key does not count.
    pub fn next_page(&mut self) -> bool {
        match self.known_total_pages() {
            Some(total) if self.current_page < total => {
                self.current_page += 1;
                true
            }
            _ => false,
        }
    }

    fn known_total_pages(&self) -> Option<u32> {
        let result = self.queries.peek(&self.query_key());
        if result.is_placeholder {
            return None;
        }
        result.data.map(|page| page.total_pages)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    // --- Search ---

    pub fn raw_search(&self) -> &str {
        self.search.raw()
    }

    pub fn debounced_search(&self) -> &str {
        self.search.debounced()
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Records a keystroke in the search box.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search.input(text, Instant::now());
    }

    /// Applies the debounced search if its window has elapsed.
    /// Returns true when the effective search changed (and the page was reset).
    pub fn poll_search(&mut self) -> bool {
        let changed = self.search.poll(Instant::now());
        self.on_search_propagated(changed)
    }

    /// Waits out the pending debounce window, then applies it.
    pub async fn settle_search(&mut self) -> bool {
        if let Some(deadline) = self.search.deadline() {
            tokio::time::sleep_until(deadline).await;
        }
        self.poll_search()
    }

    /// Applies the pending search immediately.
    pub fn flush_search(&mut self) -> bool {
        let changed = self.search.flush();
        self.on_search_propagated(changed)
    }

    fn on_search_propagated(&mut self, changed: Option<String>) -> bool {
        match changed {
            Some(text) => {
                debug!("search settled on {:?}, back to page 1", text);
                self.current_page = 1;
                true
            }
            None => false,
        }
    }

    // --- Fetching ---

    /// Resolves the current key and applies the outcome.
    pub async fn refresh(&mut self) -> NotesView {
        let key = self.query_key();
        let result = self.queries.resolve(&key).await;
        self.apply(result);
        self.view()
    }

    /// Starts resolving the current key in the background.
    ///
    /// Feed the joined result to [`NotesSession::apply`]; it is ignored if the
    /// page or search moved on in the meantime.
    pub fn spawn_fetch(&self) -> JoinHandle<QueryResult> {
        let key = self.query_key();
        let queries = Arc::clone(&self.queries);
        tokio::spawn(async move { queries.resolve(&key).await })
    }

    /// Displays `result` if it belongs to the current key. Returns whether it did.
    pub fn apply(&mut self, result: QueryResult) -> bool {
        let current = self.query_key();
        if result.key != current {
            debug!("discarding result for {} (current is {})", result.key, current);
            return false;
        }
        self.displayed = Some(result);
        true
    }

    pub fn view(&self) -> NotesView {
        let current = self.query_key();
        let result = match &self.displayed {
            Some(result) if result.key == current => result.clone(),
            _ => self.queries.peek(&current),
        };

        let (notes, total_pages) = result
            .data
            .map(|page| (page.notes, page.total_pages))
            .unwrap_or_default();

        NotesView {
            status: result.status,
            notes,
            total_pages,
            current_page: self.current_page,
            show_pagination: total_pages > 1,
            is_placeholder: result.is_placeholder,
            error: result.error,
            search: self.search.debounced().to_string(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.queries.subscribe()
    }

    // --- Modal and mutations ---

    pub fn open_modal(&self) {
        self.modal.open();
    }

    pub fn close_modal(&self) {
        self.modal.close();
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Validates `form`, creates the note and refetches the current page.
    ///
    /// Field errors come back as [`NotehubError::Validation`] without any call
    /// being made; the modal stays as it was.
    pub async fn submit_note(&mut self, form: &NoteForm) -> Result<Note> {
        let fields = form.validate().map_err(NotehubError::Validation)?;
        let note = self.mutations.create(fields, &self.modal).await?;
        self.refresh().await;
        Ok(note)
    }

    /// Deletes a note and refetches the current page.
    pub async fn delete_note(&mut self, id: &str) -> Result<()> {
        self.mutations.remove(id).await?;
        self.refresh().await;
        Ok(())
    }
}
