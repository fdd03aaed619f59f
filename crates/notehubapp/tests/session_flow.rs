use notehubapp::error::NotehubError;
use notehubapp::form::NoteForm;
use notehubapp::model::NoteTag;
use notehubapp::notify::{NotificationLevel, NotificationQueue};
use notehubapp::query::{QueryEventKind, QueryKey, QueryStatus};
use notehubapp::session::{NotesSession, SessionOptions};
use notehubapp::transport::memory::InMemoryTransport;
use std::sync::Arc;
use std::time::Duration;

fn setup(count: usize) -> (Arc<InMemoryTransport>, Arc<NotificationQueue>, NotesSession) {
    let transport = Arc::new(InMemoryTransport::with_generated(count));
    let notifications = Arc::new(NotificationQueue::new());
    let session = NotesSession::new(
        transport.clone(),
        notifications.clone(),
        SessionOptions::default(),
    );
    (transport, notifications, session)
}

#[tokio::test(start_paused = true)]
async fn test_browse_search_and_create() {
    let (transport, notifications, mut session) = setup(30);

    // 1. First screen
    let view = session.refresh().await;
    assert_eq!(view.status, QueryStatus::Success);
    assert_eq!(view.total_pages, 3);
    assert!(view.show_pagination);

    // 2. Go to page 2, then search: page resets
    assert!(session.next_page());
    session.refresh().await;
    session.type_search("note 1");
    assert!(session.settle_search().await);
    let view = session.refresh().await;
    assert_eq!(view.current_page, 1);
    // "Note 1" and "Note 10" to "Note 19"
    assert_eq!(view.notes.len(), 11);
    assert!(!view.show_pagination);

    // 3. Create from the modal
    session.open_modal();
    let form = NoteForm::new()
        .with_title("Note 1 follow-up")
        .with_content("call back")
        .with_tag(NoteTag::Work);
    let created = session.submit_note(&form).await.unwrap();
    assert!(!session.modal_open());
    assert_eq!(session.view().notes[0], created);

    assert_eq!(transport.list_calls(), 4);
    let messages = notifications.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Note created: Note 1 follow-up");
}

#[tokio::test(start_paused = true)]
async fn test_revisiting_fresh_page_uses_cache() {
    let (transport, _, mut session) = setup(30);
    session.refresh().await;
    session.set_page(2);
    session.refresh().await;
    session.set_page(1);

    tokio::time::advance(Duration::from_secs(120)).await;
    session.refresh().await;
    assert_eq!(transport.list_calls(), 2);

    tokio::time::advance(Duration::from_secs(180)).await;
    session.refresh().await;
    assert_eq!(transport.list_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_list_failure_is_shown_then_recovers() {
    let (transport, notifications, mut session) = setup(5);
    transport.fail_next_list(NotehubError::Http {
        status: 401,
        message: "Unauthorized".into(),
    });

    let view = session.refresh().await;
    assert_eq!(view.status, QueryStatus::Error);
    assert_eq!(view.error.unwrap().status(), Some(401));
    // fetch errors are shown in place, not as notifications
    assert!(notifications.is_empty());

    let view = session.refresh().await;
    assert_eq!(view.status, QueryStatus::Success);
    assert_eq!(view.notes.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_delete_refetches_and_notifies() {
    let (transport, notifications, mut session) = setup(3);
    let view = session.refresh().await;
    let victim = view.notes[1].clone();

    let mut events = session.subscribe();
    session.delete_note(&victim.id).await.unwrap();

    let view = session.view();
    assert_eq!(view.notes.len(), 2);
    assert!(!view.notes.contains(&victim));
    assert_eq!(transport.delete_calls(), 1);
    assert_eq!(notifications.drain()[0].level, NotificationLevel::Success);

    let first = events.try_recv().unwrap();
    assert_eq!(first.key, QueryKey::notes(1, ""));
    assert_eq!(first.kind, QueryEventKind::Invalidated);
}
