//! # CLI Behavior
//!
//! This is **one possible UI client** for notehub, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ### Naked Execution (`notehub`)
//!
//! Running `notehub` with no arguments defaults to `notehub list`.
//!
//! ### Create
//!
//! `notehub create --title T` validates the form before anything is sent. Field
//! errors are printed one per line and the process exits non-zero without a
//! network call.
//!
//! ### Browse
//!
//! `notehub browse` is the interactive screen. Plain lines are search text and
//! go through the same 500 ms debounce a search box would; lines starting with
//! `:` are commands (`:help` lists them).
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `browse`: Interactive loop
//! - `render`: Output formatting (note list, messages, config)
//! - `setup`: Argument parsing via clap

mod browse;
mod commands;
mod render;
pub mod setup;

pub use commands::run;
