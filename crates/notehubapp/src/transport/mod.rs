//! # Transport Layer
//!
//! This module defines the boundary to the remote notes store. The [`NotesTransport`]
//! trait is the only way the rest of the crate talks to the API.
//!
//! ## Design Rationale
//!
//! The transport is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryTransport` (no network needed)
//! - Keep the cache and mutation logic **decoupled** from HTTP details
//!
//! ## Implementations
//!
//! - [`http::HttpTransport`]: Production client built on `reqwest`
//!   - Bearer token on every request
//!   - Maps transport failures and non-2xx statuses onto [`NotehubError`](crate::error::NotehubError)
//!
//! - [`memory::InMemoryTransport`]: In-memory server for tests and demos
//!   - Same search and pagination semantics as the API
//!   - Injectable failures and artificial latency
//!
//! ## Error Contract
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Connection refused, timeout, DNS | `Network` |
//! | 404 | `NotFound` |
//! | Any other non-2xx | `Http { status, message }` |
//! | Body does not decode | `Decode` |

use crate::error::Result;
use crate::model::{ListParams, NewNote, Note, NotesPage};
use async_trait::async_trait;

pub mod http;
pub mod memory;

/// Abstract interface for the remote notes collection.
#[async_trait]
pub trait NotesTransport: Send + Sync {
    /// Fetch one page of notes matching `params.search`
    async fn list_notes(&self, params: &ListParams) -> Result<NotesPage>;

    /// Create a note; the returned note carries the server-assigned id
    async fn create_note(&self, note: &NewNote) -> Result<Note>;

    /// Delete a note by id, returning the removed note
    async fn delete_note(&self, id: &str) -> Result<Note>;
}
