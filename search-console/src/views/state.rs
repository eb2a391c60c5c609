//! Load state shared by every view.
//!
//! A view action moves its slot from `Idle` to `Loading` and then to `Success`
//! or `Error`. Each `begin` issues a new ticket; only the latest ticket may
//! resolve the slot, so a slow stale response never overwrites a newer one.

use tracing::debug;

/// State of one user-triggered action.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Sequence number handed out when an action starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A load state plus the sequence of requests issued for it.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    state: LoadState<T>,
    latest: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            latest: 0,
        }
    }
}

impl<T> Slot<T> {
    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Start a request: the slot shows `Loading` until the returned ticket resolves it.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.state = LoadState::Loading;
        Ticket(self.latest)
    }

    /// Apply a response if `ticket` is still the latest one issued.
    ///
    /// Returns whether the response was applied.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.latest, "Discarding stale response");
            return false;
        }

        self.state = match outcome {
            Ok(value) => LoadState::Success(value),
            Err(message) => LoadState::Error(message),
        };
        true
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Set a state directly (local validation results), invalidating in-flight requests.
    pub fn set(&mut self, state: LoadState<T>) {
        self.latest += 1;
        self.state = state;
    }

    /// Back to `Idle`, invalidating in-flight requests.
    pub fn reset(&mut self) {
        self.set(LoadState::Idle);
    }
}

/// Severity of a status message shown under a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A one-line status message, e.g. the result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
