//! Trailing-edge debounce for search input.
//!
//! Every keystroke updates the raw text immediately and restarts the window.
//! Only when the raw text has been left alone for the whole window does it
//! become the debounced text; intermediate values are dropped. The machine is
//! clock-agnostic: callers pass `now` in, and [`SearchDebounce::deadline`]
//! tells an event loop when to poll next.

use tokio::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SearchDebounce {
    raw: String,
    debounced: String,
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for SearchDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebounce {
    pub fn new(window: Duration) -> Self {
        Self {
            raw: String::new(),
            debounced: String::new(),
            window,
            deadline: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn debounced(&self) -> &str {
        &self.debounced
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// When the pending value will propagate, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records a keystroke. Cancels any pending deadline and starts a new one.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.raw = text.into();
        self.deadline = Some(now + self.window);
    }

    /// Propagates the raw text once the deadline has passed.
    ///
    /// Returns the new debounced text only if it differs from the previous one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.propagate(),
            _ => None,
        }
    }

    /// Propagates immediately, skipping the rest of the window.
    pub fn flush(&mut self) -> Option<String> {
        if self.deadline.is_some() {
            self.propagate()
        } else {
            None
        }
    }

    /// Drops the pending value and reverts the raw text to the debounced text,
    /// as clearing an edited search box back to its applied value would.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.raw = self.debounced.clone();
    }

    fn propagate(&mut self) -> Option<String> {
        self.deadline = None;
        if self.raw == self.debounced {
            return None;
        }
        self.debounced = self.raw.clone();
        Some(self.debounced.clone())
    }
}
