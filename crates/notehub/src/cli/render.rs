//! # Rendering
//!
//! Turns library values into terminal text. Functions named `render_*` build
//! strings so they can be tested; `print_*` write them to stdout.
//!
//! ## List Layout
//!
//! Each note is one row:
//! - `id` (as wide as the id): needed for `notehub delete`
//! - `tag` (10 chars)
//! - `title` (fill): truncated to fit
//! - `time_ago` (14 chars, right-aligned): creation time
//!
//! The pagination line is only printed when there is more than one page.

use chrono::{DateTime, Utc};
use colored::Colorize;
use notehubapp::config::NotehubConfig;
use notehubapp::model::Note;
use notehubapp::notify::{Notification, NotificationLevel};
use notehubapp::query::QueryStatus;
use notehubapp::session::NotesView;
use notehubapp::validation::FormErrors;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const TAG_WIDTH: usize = 10;
const TIME_WIDTH: usize = 14;

pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        match notification.level {
            NotificationLevel::Info => println!("{}", notification.content.dimmed()),
            NotificationLevel::Success => println!("{}", notification.content.green()),
            NotificationLevel::Warning => println!("{}", notification.content.yellow()),
            NotificationLevel::Error => println!("{}", notification.content.red()),
        }
    }
}

/// One line per failing field, the way a form shows them under each input.
pub fn render_field_errors(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}\n", e.field().to_string().bold(), e.to_string().red()))
        .collect()
}

pub fn print_field_errors(errors: &FormErrors) {
    eprint!("{}", render_field_errors(errors));
}

pub fn render_view(view: &NotesView) -> String {
    let mut out = String::new();

    if !view.search.is_empty() {
        out.push_str(&format!("{}\n", format!("Search: {}", view.search).dimmed()));
    }

    match view.status {
        QueryStatus::Error => {
            let message = view
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            out.push_str(&format!("{}\n", format!("Could not load notes: {}", message).red()));
            return out;
        }
        QueryStatus::Loading if view.notes.is_empty() => {
            out.push_str(&format!("{}\n", "Loading...".dimmed()));
            return out;
        }
        _ => {}
    }

    if view.notes.is_empty() {
        out.push_str("No notes found.\n");
    }
    for note in &view.notes {
        let line = render_note_line(note);
        if view.is_placeholder {
            out.push_str(&format!("{}\n", line.dimmed()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }

    if view.show_pagination {
        out.push_str(&format!(
            "\n{}\n",
            format!("Page {} of {}", view.current_page, view.total_pages).bold()
        ));
    }
    out
}

pub fn print_view(view: &NotesView) {
    print!("{}", render_view(view));
}

fn render_note_line(note: &Note) -> String {
    let id_width = note.id.width();
    let time_ago = note.created_at.map(format_time_ago).unwrap_or_default();
    let title_width = LINE_WIDTH.saturating_sub(id_width + 2 + TAG_WIDTH + 1 + TIME_WIDTH + 1);

    let title = truncate_to_width(&note.title, title_width);
    let padding = " ".repeat(title_width.saturating_sub(title.width()));

    format!(
        "{}  {:<tag_width$} {}{} {:>time_width$}",
        note.id.yellow(),
        note.tag.as_str(),
        title,
        padding,
        time_ago.dimmed(),
        tag_width = TAG_WIDTH,
        time_width = TIME_WIDTH,
    )
}

pub fn render_config(config: &NotehubConfig) -> String {
    let token = match config.token.as_deref() {
        Some(token) if !token.is_empty() => mask_token(token),
        _ => "(not set)".to_string(),
    };
    format!(
        "base_url = {}\ntoken = {}\nper_page = {}\nstale_time_secs = {}\ndebounce_ms = {}\nrequest_timeout_secs = {}\n",
        config.base_url,
        token,
        config.per_page(),
        config.stale_time_secs,
        config.debounce_ms,
        config.request_timeout_secs,
    )
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{}****", visible)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}
