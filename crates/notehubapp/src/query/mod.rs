//! # Query Layer
//!
//! Fetching notes is keyed by a [`QueryKey`]: the page number plus the debounced
//! search text, under the `notes` namespace. The [`QueryCache`] maps keys to
//! entries and the [`FetchOrchestrator`] decides when an entry can be served as
//! is and when the transport must be asked again.
//!
//! ## Entry Lifecycle
//!
//! ```text
//!   (absent) ──resolve──► fetching ──ok──► fresh ──5 min──► stale
//!                            │                 │
//!                            └──err──► error   └──invalidate──► invalidated
//! ```
//!
//! Stale, invalidated and errored entries are refetched on the next `resolve`.
//! Invalidation never drops data: a list that is on screen keeps rendering its
//! old page until the new one arrives.

pub mod cache;
pub mod key;
pub mod orchestrator;

pub use cache::{CacheEntry, QueryCache, QueryEvent, QueryEventKind};
pub use key::{QueryKey, NOTES_NAMESPACE};
pub use orchestrator::{FetchOrchestrator, QueryResult, QueryStatus};
