//! # Notehub Architecture
//!
//! Notehub is a **UI-agnostic client library** for the NoteHub REST API. The terminal
//! binary is one client of it; a GUI or web front end would drive the very same types.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (session.rs)                                 │
//! │  - Owns UI transient state: page, search text, modal        │
//! │  - Drops results whose key is no longer current             │
//! │  - Produces a `NotesView` for rendering                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Coordination Layer (query/, mutation.rs, debounce.rs)      │
//! │  - Query keys, cache with freshness and invalidation        │
//! │  - Create/delete with invalidation and notifications        │
//! │  - Trailing debounce for search input                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport Layer (transport/)                               │
//! │  - Abstract NotesTransport trait                            │
//! │  - HttpTransport (production), InMemoryTransport (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process. Failures are
//! values: a fetch failure becomes the error state of one query key, a mutation
//! failure becomes a [`notify::Notification`] plus an `Err` for the caller.
//!
//! ## Control Flow
//!
//! ```text
//! keystrokes ─► SearchDebounce ─► QueryKey ─► FetchOrchestrator ─► NotesView
//! create/delete ─► MutationCoordinator ─► invalidate("notes") ─► refetch
//! ```
//!
//! ## Testing Strategy
//!
//! Every layer is tested against [`transport::memory::InMemoryTransport`], with tokio's
//! paused clock standing in for real time. Debounce windows and freshness windows
//! are therefore exercised deterministically, without sleeping.
//!
//! ## Module Overview
//!
//! - [`session`]: Facade used by clients
//! - [`query`]: Query keys, the cache store and the fetch orchestrator
//! - [`mutation`]: Create/delete coordination
//! - [`debounce`]: Search debounce state machine
//! - [`transport`]: Transport abstraction and implementations
//! - [`model`]: Core data types (`Note`, `NoteTag`, `NotesPage`)
//! - [`form`], [`validation`]: Note form state and field rules
//! - [`notify`]: Toast-style notifications
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod session;
pub mod transport;
pub mod validation;
