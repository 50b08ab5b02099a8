/// URL state definitions for tracking crawl progress
///
/// A URL moves through `unseen -> Queued -> Dispatched` at most once per run.
/// "Unseen" has no variant: it is the absence of an entry in the frontier.
use std::fmt;

/// Represents the current state of a canonical URL within one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    /// URL has been accepted by the frontier and waits for a worker
    Queued,

    /// URL has been handed to a worker for fetching (terminal)
    Dispatched,
}

impl UrlState {
    /// Returns true if this is a terminal state (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dispatched)
    }

    /// Returns true if the URL is still waiting to be fetched
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// The only legal transition is `Queued -> Dispatched`; a dispatched URL
    /// is never re-queued within the same run.
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!((self, next), (Self::Queued, Self::Dispatched))
    }

    /// Returns a short lowercase label for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Dispatched => "dispatched",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!UrlState::Queued.is_terminal());
        assert!(UrlState::Dispatched.is_terminal());
    }

    #[test]
    fn test_is_pending() {
        assert!(UrlState::Queued.is_pending());
        assert!(!UrlState::Dispatched.is_pending());
    }

    #[test]
    fn test_transitions() {
        assert!(UrlState::Queued.can_transition_to(UrlState::Dispatched));

        assert!(!UrlState::Queued.can_transition_to(UrlState::Queued));
        assert!(!UrlState::Dispatched.can_transition_to(UrlState::Queued));
        assert!(!UrlState::Dispatched.can_transition_to(UrlState::Dispatched));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UrlState::Queued), "queued");
        assert_eq!(format!("{}", UrlState::Dispatched), "dispatched");
    }
}
