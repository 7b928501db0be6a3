//! Per-endpoint load state machine.
//!
//! A [`Loader`] keeps the last good value, the status of the most recent
//! request and the ticket of the request it is waiting for. Completions with
//! any other ticket are dropped, which is what keeps a slow, superseded
//! response from overwriting a newer one.

use std::fmt;

/// Identifies one issued request. Tickets are unique per dashboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of the latest request for one endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Flat, user-facing failure text.
    Failed(String),
}

#[derive(Clone, Debug, Default)]
pub struct Loader<T> {
    value: T,
    status: LoadStatus,
    pending: Option<RequestTicket>,
}

impl<T> Loader<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            status: LoadStatus::Idle,
            pending: None,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<RequestTicket> {
        self.pending
    }

    /// Enter `Loading` for `ticket`, superseding any request still pending.
    pub fn begin(&mut self, ticket: RequestTicket) {
        self.pending = Some(ticket);
        self.status = LoadStatus::Loading;
    }

    /// Replace the value without touching the status (e.g. clearing on reselect).
    pub fn reset_value(&mut self, value: T) {
        self.value = value;
    }

    /// Store a successful response. Returns `false` if `ticket` is stale.
    pub fn succeed(&mut self, ticket: RequestTicket, value: T) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.value = value;
        self.status = LoadStatus::Loaded;
        true
    }

    /// Record a failure, keeping the previous value. Returns `false` if stale.
    pub fn fail(&mut self, ticket: RequestTicket, message: impl Into<String>) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.status = LoadStatus::Failed(message.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_without_error() {
        let l: Loader<Vec<u8>> = Loader::default();
        assert_eq!(l.status(), &LoadStatus::Idle);
        assert!(!l.is_loading());
        assert_eq!(l.error(), None);
    }

    #[test]
    fn success_replaces_value() {
        let mut l = Loader::new(vec![1]);
        l.begin(RequestTicket(1));
        assert!(l.is_loading());
        assert!(l.succeed(RequestTicket(1), vec![2, 3]));
        assert_eq!(l.value(), &vec![2, 3]);
        assert_eq!(l.status(), &LoadStatus::Loaded);
        assert_eq!(l.pending(), None);
    }

    #[test]
    fn failure_keeps_previous_value() {
        let mut l = Loader::new(vec![1]);
        l.begin(RequestTicket(1));
        assert!(l.fail(RequestTicket(1), "boom"));
        assert_eq!(l.value(), &vec![1]);
        assert_eq!(l.error(), Some("boom"));
        assert!(!l.is_loading());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut l = Loader::new(Vec::<u8>::new());
        l.begin(RequestTicket(1));
        l.begin(RequestTicket(2));
        assert!(!l.succeed(RequestTicket(1), vec![9]));
        assert!(!l.fail(RequestTicket(1), "late"));
        assert!(l.is_loading());
        assert!(l.value().is_empty());
        assert!(l.succeed(RequestTicket(2), vec![7]));
        assert_eq!(l.value(), &vec![7]);
    }

    #[test]
    fn later_success_clears_own_error() {
        let mut l = Loader::new(0u8);
        l.begin(RequestTicket(1));
        l.fail(RequestTicket(1), "nope");
        l.begin(RequestTicket(2));
        l.succeed(RequestTicket(2), 5);
        assert_eq!(l.error(), None);
    }
}
