//! # Notehub CLI Architecture
//!
//! The `notehub` binary is a thin terminal client for the `notehubapp` library.
//! The CLI lives in `src/cli/`; this file only starts the runtime, invokes
//! `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/notehubapp/`: UI-agnostic client library (queries, mutations, session)
//! - `crates/notehub/`: This CLI tool, depends on the `notehubapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/notehub/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Interactive browse loop (browse.rs)                      │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (crates/notehubapp/src/session.rs)           │
//! │  - Page, search and modal state                             │
//! │  - Returns a `NotesView` to render                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from the session inward is UI agnostic. The CLI layer is
//! responsible for **all** user-facing concerns: argument parsing, logging
//! setup, dispatch, error reporting and rendering.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests per module plus session flows against the
//!   in-memory transport.
//! - **Rendering**: canned `NotesView` values rendered to strings.
//! - **Binary**: `assert_cmd` runs against `--demo`, which swaps the HTTP
//!   transport for a seeded in-memory one.

mod cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
