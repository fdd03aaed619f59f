//! # Mutations
//!
//! Create and delete go straight to the transport. Their effect on cached lists
//! is handled by invalidation rather than by patching pages locally: after a
//! successful mutation every `notes` entry is marked stale, and whichever views
//! are showing those keys refetch.
//!
//! ## Outcome Handling
//!
//! | Outcome | Cache | Modal | Notification |
//! |---------|-------|-------|--------------|
//! | create ok | invalidate `notes` | closed | success |
//! | create err | untouched | stays open | error |
//! | delete ok | invalidate `notes` | n/a | success |
//! | delete err | untouched | n/a | error |
//!
//! Errors are also returned to the caller, but by then the user has already
//! been told. Nothing is retried.

use crate::error::Result;
use crate::model::{NewNote, Note};
use crate::notify::{Notification, Notifier};
use crate::query::{FetchOrchestrator, NOTES_NAMESPACE};
use crate::transport::NotesTransport;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Open/closed flag of the note creation modal, shared with the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct ModalState(Arc<AtomicBool>);

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct MutationCoordinator {
    transport: Arc<dyn NotesTransport>,
    queries: Arc<FetchOrchestrator>,
    notifier: Arc<dyn Notifier>,
}

impl MutationCoordinator {
    pub fn new(
        transport: Arc<dyn NotesTransport>,
        queries: Arc<FetchOrchestrator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            queries,
            notifier,
        }
    }

    /// Creates a note from already validated fields.
    pub async fn create(&self, fields: NewNote, modal: &ModalState) -> Result<Note> {
        match self.transport.create_note(&fields).await {
            Ok(note) => {
                info!("created note {}", note.id);
                self.queries.invalidate_namespace(NOTES_NAMESPACE);
                modal.close();
                self.notifier
                    .notify(Notification::success(format!("Note created: {}", note.title)));
                Ok(note)
            }
            Err(e) => {
                error!("creating note {:?} failed: {}", fields.title, e);
                self.notifier
                    .notify(Notification::error(format!("Failed to create note: {}", e)));
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        match self.transport.delete_note(id).await {
            Ok(note) => {
                info!("deleted note {}", note.id);
                self.queries.invalidate_namespace(NOTES_NAMESPACE);
                self.notifier
                    .notify(Notification::success(format!("Note deleted: {}", note.title)));
                Ok(())
            }
            Err(e) => {
                error!("deleting note {} failed: {}", id, e);
                self.notifier
                    .notify(Notification::error(format!("Failed to delete note: {}", e)));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotehubError;
    use crate::model::NoteTag;
    use crate::notify::{NotificationLevel, NotificationQueue};
    use crate::query::{QueryKey, QueryStatus};
    use crate::transport::memory::InMemoryTransport;

    struct Fixture {
        transport: Arc<InMemoryTransport>,
        queries: Arc<FetchOrchestrator>,
        notifications: Arc<NotificationQueue>,
        coordinator: MutationCoordinator,
    }

    fn setup(count: usize) -> Fixture {
        let transport = Arc::new(InMemoryTransport::with_generated(count));
        let queries = Arc::new(FetchOrchestrator::new(transport.clone()));
        let notifications = Arc::new(NotificationQueue::new());
        let coordinator =
            MutationCoordinator::new(transport.clone(), queries.clone(), notifications.clone());
        Fixture {
            transport,
            queries,
            notifications,
            coordinator,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_success_invalidates_closes_and_notifies() {
        let fx = setup(3);
        let key = QueryKey::notes(1, "");
        fx.queries.resolve(&key).await;

        let modal = ModalState::new();
        modal.open();
        let note = fx
            .coordinator
            .create(NewNote::new("Buy milk", "", NoteTag::Shopping), &modal)
            .await
            .unwrap();

        assert!(!modal.is_open());
        assert!(fx.queries.entry(&key).unwrap().invalidated);

        let refreshed = fx.queries.resolve(&key).await;
        assert_eq!(refreshed.data.unwrap().notes[0], note);
        assert_eq!(fx.transport.list_calls(), 2);

        let messages = fx.notifications.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, NotificationLevel::Success);
        assert_eq!(messages[0].content, "Note created: Buy milk");
    }

    #[tokio::test(start_paused = true)]
    async fn create_failure_keeps_modal_and_cache() {
        let fx = setup(3);
        let key = QueryKey::notes(1, "");
        fx.queries.resolve(&key).await;
        let before = fx.queries.entries();

        fx.transport.fail_next_create(NotehubError::Network("offline".into()));
        let modal = ModalState::new();
        modal.open();
        let result = fx
            .coordinator
            .create(NewNote::new("Buy milk", "", NoteTag::Shopping), &modal)
            .await;

        assert!(result.is_err());
        assert!(modal.is_open());
        assert_eq!(fx.queries.entries(), before);

        let messages = fx.notifications.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, NotificationLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delete_leaves_cache_untouched() {
        let fx = setup(30);
        let one = QueryKey::notes(1, "");
        let two = QueryKey::notes(2, "");
        fx.queries.resolve(&one).await;
        fx.queries.resolve(&two).await;
        let before = fx.queries.entries();

        let err = fx.coordinator.remove("abc123").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(fx.queries.entries(), before);

        let messages = fx.notifications.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].level, NotificationLevel::Error);
        assert_eq!(
            messages[0].content,
            "Failed to delete note: Note not found: abc123"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_create_and_delete_refetch_once() {
        let fx = setup(5);
        let key = QueryKey::notes(1, "");
        let first = fx.queries.resolve(&key).await;
        let victim = first.data.unwrap().notes[2].clone();

        let modal = ModalState::new();
        modal.open();
        let (created, removed) = tokio::join!(
            fx.coordinator
                .create(NewNote::new("Buy milk", "", NoteTag::Shopping), &modal),
            fx.coordinator.remove(&victim.id)
        );
        let created = created.unwrap();
        removed.unwrap();
        assert!(fx.queries.entry(&key).unwrap().invalidated);

        let refreshed = fx.queries.resolve(&key).await;
        fx.queries.resolve(&key).await;
        assert_eq!(fx.transport.list_calls(), 2);

        let notes = refreshed.data.unwrap().notes;
        assert!(notes.contains(&created));
        assert!(!notes.contains(&victim));
        assert_eq!(fx.notifications.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_success_refetches_every_cached_key_once() {
        let fx = setup(30);
        let one = QueryKey::notes(1, "");
        let searched = QueryKey::notes(1, "Note 2");
        let first = fx.queries.resolve(&one).await;
        fx.queries.resolve(&searched).await;

        let victim = first.data.unwrap().notes[0].id.clone();
        fx.coordinator.remove(&victim).await.unwrap();

        for key in [&one, &searched] {
            let result = fx.queries.resolve(key).await;
            assert_eq!(result.status, QueryStatus::Success);
            fx.queries.resolve(key).await;
        }
        assert_eq!(fx.transport.list_calls(), 4);
        assert!(fx
            .queries
            .peek(&one)
            .data
            .unwrap()
            .notes
            .iter()
            .all(|n| n.id != victim));
    }
}
