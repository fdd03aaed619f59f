//! # CLI Layer
//!
//! This module is **one possible UI client** for notehub.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Initializes logging
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Build a `NotesSession` over the HTTP (or demo) transport
//! 3. **Dispatch**: Route commands to handlers
//! 4. **Output Formatting**: Delegate to `render`
//! 5. **Error Handling**: Return errors to `main`, which prints them and exits 1

use super::browse;
use super::render;
use super::setup::{Cli, Commands};
use clap::Parser;
use log::debug;
use notehubapp::config::NotehubConfig;
use notehubapp::error::{NotehubError, Result};
use notehubapp::form::NoteForm;
use notehubapp::model::NoteTag;
use notehubapp::notify::NotificationQueue;
use notehubapp::session::NotesSession;
use notehubapp::transport::http::HttpTransport;
use notehubapp::transport::memory::InMemoryTransport;
use notehubapp::transport::NotesTransport;
use std::sync::Arc;

/// Notes seeded into the `--demo` store.
const DEMO_NOTE_COUNT: usize = 30;

pub struct AppContext {
    pub session: NotesSession,
    pub notifications: Arc<NotificationQueue>,
}

impl AppContext {
    pub fn new(config: &NotehubConfig, demo: bool) -> Result<Self> {
        let transport: Arc<dyn NotesTransport> = if demo {
            debug!("using in-memory demo store");
            Arc::new(InMemoryTransport::with_generated(DEMO_NOTE_COUNT))
        } else {
            Arc::new(HttpTransport::from_config(config)?)
        };
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &NotehubConfig, transport: Arc<dyn NotesTransport>) -> Self {
        let notifications = Arc::new(NotificationQueue::new());
        let session = NotesSession::from_config(config, transport, notifications.clone());
        Self {
            session,
            notifications,
        }
    }

    /// Prints and clears pending notifications.
    pub fn flush_notifications(&self) {
        render::print_notifications(&self.notifications.drain());
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = NotehubConfig::load()?;
    let command = cli.command.unwrap_or_default();

    match command {
        Commands::Config => handle_config(&config),
        Commands::Create {
            title,
            content,
            tag,
        } => {
            // validated before a transport is even built
            let form = validated_form(title, content, tag)?;
            let mut ctx = AppContext::new(&config, cli.demo)?;
            handle_create(&mut ctx, &form).await
        }
        Commands::List { page, search } => {
            let mut ctx = AppContext::new(&config, cli.demo)?;
            handle_list(&mut ctx, page, search).await
        }
        Commands::Delete { ids } => {
            let mut ctx = AppContext::new(&config, cli.demo)?;
            handle_delete(&mut ctx, &ids).await
        }
        Commands::Browse => {
            let mut ctx = AppContext::new(&config, cli.demo)?;
            browse::run(&mut ctx).await
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn validated_form(title: String, content: String, tag: NoteTag) -> Result<NoteForm> {
    let form = NoteForm::new()
        .with_title(title)
        .with_content(content)
        .with_tag(tag);
    if let Err(errors) = form.validate() {
        render::print_field_errors(&errors);
        return Err(NotehubError::Validation(errors));
    }
    Ok(form)
}

fn handle_config(config: &NotehubConfig) -> Result<()> {
    print!("{}", render::render_config(config));
    Ok(())
}

async fn handle_list(ctx: &mut AppContext, page: u32, search: Option<String>) -> Result<()> {
    if let Some(search) = search {
        ctx.session.type_search(search);
        ctx.session.flush_search();
    }
    ctx.session.set_page(page);

    let view = ctx.session.refresh().await;
    if let Some(error) = &view.error {
        return Err(error.clone());
    }
    render::print_view(&view);
    Ok(())
}

async fn handle_create(ctx: &mut AppContext, form: &NoteForm) -> Result<()> {
    ctx.session.open_modal();
    let result = ctx.session.submit_note(form).await;
    ctx.flush_notifications();
    let note = result?;
    println!("{}", note.id);
    Ok(())
}

/// Deletes every id, reporting each outcome. Fails if any delete failed.
async fn handle_delete(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let mut first_error = None;
    for id in ids {
        if let Err(e) = ctx.session.delete_note(id).await {
            first_error.get_or_insert(e);
        }
        ctx.flush_notifications();
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
