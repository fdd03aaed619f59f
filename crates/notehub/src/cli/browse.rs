//! Interactive browse loop.
//!
//! Stdin lines, the search debounce deadline and the latest background fetch
//! are awaited together. A fetch is spawned after every page or search change;
//! its result is only drawn if the session still points at the same key.

use super::commands::AppContext;
use super::render;
use log::debug;
use notehubapp::error::{NotehubError, Result};
use notehubapp::form::NoteForm;
use notehubapp::model::NoteTag;
use notehubapp::query::QueryResult;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::Instant;

const HELP: &str = "\
Type to search. Commands:
  :n / :p       next / previous page
  :g N          go to page N
  :add TAG TITLE  create a note (tags: Todo Work Personal Meeting Shopping)
  :rm ID        delete a note
  :q            quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Search(String),
    Next,
    Prev,
    Goto(u32),
    Add { tag: NoteTag, title: String },
    Remove(String),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_input(line: &str) -> BrowseInput {
    let Some(command) = line.strip_prefix(':') else {
        return BrowseInput::Search(line.to_string());
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    match name {
        "n" | "next" => BrowseInput::Next,
        "p" | "prev" => BrowseInput::Prev,
        "g" | "go" => match rest.parse() {
            Ok(page) if page >= 1 => BrowseInput::Goto(page),
            _ => BrowseInput::Invalid(format!("not a page number: {:?}", rest)),
        },
        "add" => {
            let mut words = rest.splitn(2, char::is_whitespace);
            let tag = words.next().unwrap_or_default();
            let title = words.next().unwrap_or_default().trim().to_string();
            match tag.parse() {
                Ok(tag) => BrowseInput::Add { tag, title },
                Err(e) => BrowseInput::Invalid(format!("{}", e)),
            }
        }
        "rm" if !rest.is_empty() => BrowseInput::Remove(rest.to_string()),
        "rm" => BrowseInput::Invalid("usage: :rm ID".to_string()),
        "h" | "help" | "?" => BrowseInput::Help,
        "q" | "quit" => BrowseInput::Quit,
        other => BrowseInput::Invalid(format!("unknown command :{}", other)),
    }
}

pub async fn run(ctx: &mut AppContext) -> Result<()> {
    println!("{}\n", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Some(ctx.session.spawn_fetch());

    loop {
        let deadline = ctx.session.search_deadline();

        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // EOF or unreadable stdin ends the session
                    _ => break,
                };
                match parse_input(&line) {
                    BrowseInput::Quit => break,
                    input => {
                        if let Some(handle) = handle_input(ctx, input).await {
                            pending = Some(handle);
                        }
                    }
                }
            }
            _ = wait_until(deadline) => {
                if ctx.session.poll_search() {
                    pending = Some(ctx.session.spawn_fetch());
                }
            }
            result = join(&mut pending) => {
                pending = None;
                if let Some(result) = result {
                    if ctx.session.apply(result) {
                        render::print_view(&ctx.session.view());
                    }
                }
            }
        }
    }
    Ok(())
}

/// Returns a new fetch when the input changed what should be displayed.
async fn handle_input(ctx: &mut AppContext, input: BrowseInput) -> Option<JoinHandle<QueryResult>> {
    let session = &mut ctx.session;
    match input {
        BrowseInput::Search(text) => {
            session.type_search(text);
            None
        }
        BrowseInput::Next => session.next_page().then(|| session.spawn_fetch()),
        BrowseInput::Prev => session.prev_page().then(|| session.spawn_fetch()),
        BrowseInput::Goto(page) => {
            session.set_page(page);
            Some(session.spawn_fetch())
        }
        BrowseInput::Add { tag, title } => {
            session.open_modal();
            let form = NoteForm::new().with_title(title).with_tag(tag);
            match session.submit_note(&form).await {
                Ok(_) => render::print_view(&session.view()),
                Err(NotehubError::Validation(errors)) => render::print_field_errors(&errors),
                Err(e) => debug!("create failed: {}", e),
            }
            ctx.flush_notifications();
            None
        }
        BrowseInput::Remove(id) => {
            if session.delete_note(&id).await.is_ok() {
                render::print_view(&session.view());
            }
            ctx.flush_notifications();
            None
        }
        BrowseInput::Help => {
            println!("{}", HELP);
            None
        }
        BrowseInput::Invalid(message) => {
            eprintln!("{}", message);
            None
        }
        BrowseInput::Quit => None,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn join(pending: &mut Option<JoinHandle<QueryResult>>) -> Option<QueryResult> {
    match pending {
        Some(handle) => handle.await.ok(),
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehubapp::config::NotehubConfig;
    use notehubapp::transport::memory::InMemoryTransport;
    use std::sync::Arc;

    fn context(transport: &Arc<InMemoryTransport>) -> AppContext {
        AppContext::with_transport(&NotehubConfig::default(), transport.clone())
    }

    fn add(title: &str) -> BrowseInput {
        BrowseInput::Add {
            tag: NoteTag::Shopping,
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn failed_add_leaves_modal_open() {
        let transport = Arc::new(InMemoryTransport::with_generated(3));
        transport.fail_next_create(NotehubError::Network("offline".into()));
        let mut ctx = context(&transport);

        assert!(handle_input(&mut ctx, add("Buy milk")).await.is_none());
        assert_eq!(transport.create_calls(), 1);
        assert!(ctx.session.modal_open());
    }

    #[tokio::test]
    async fn successful_add_closes_modal() {
        let transport = Arc::new(InMemoryTransport::with_generated(3));
        let mut ctx = context(&transport);

        handle_input(&mut ctx, add("Buy milk")).await;
        assert!(!ctx.session.modal_open());
        assert_eq!(transport.notes()[0].title, "Buy milk");
    }

    #[test]
    fn plain_lines_are_search_text() {
        assert_eq!(parse_input("tea"), BrowseInput::Search("tea".into()));
        assert_eq!(parse_input(""), BrowseInput::Search(String::new()));
    }

    #[test]
    fn paging_commands() {
        assert_eq!(parse_input(":n"), BrowseInput::Next);
        assert_eq!(parse_input(":prev"), BrowseInput::Prev);
        assert_eq!(parse_input(":g 3"), BrowseInput::Goto(3));
        assert!(matches!(parse_input(":g 0"), BrowseInput::Invalid(_)));
        assert!(matches!(parse_input(":g x"), BrowseInput::Invalid(_)));
    }

    #[test]
    fn add_takes_tag_then_title() {
        assert_eq!(
            parse_input(":add shopping Buy milk"),
            BrowseInput::Add {
                tag: NoteTag::Shopping,
                title: "Buy milk".into()
            }
        );
        assert!(matches!(parse_input(":add urgent Buy milk"), BrowseInput::Invalid(_)));
    }

    #[test]
    fn remove_needs_an_id() {
        assert_eq!(parse_input(":rm abc123"), BrowseInput::Remove("abc123".into()));
        assert!(matches!(parse_input(":rm"), BrowseInput::Invalid(_)));
    }

    #[test]
    fn quit_and_unknown() {
        assert_eq!(parse_input(":q"), BrowseInput::Quit);
        assert!(matches!(parse_input(":zzz"), BrowseInput::Invalid(_)));
    }
}
