/// URL state definitions for tracking harvest progress
///
/// This module defines every state a backlog URL can be in and which moves
/// between them are legal.
use crate::url::PageUrl;
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a URL in the harvest process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    // ===== Active States =====
    /// URL is waiting in the backlog
    Pending,

    /// URL was popped by a worker and admitted to the visited set
    Claimed,

    /// Body was fetched successfully and is awaiting digest admission
    Fetched,

    // ===== Terminal States =====
    /// Body was new and handed to the sink
    Accepted,

    /// Fetch failed (transport error, timeout or non-2xx status)
    FetchFailed,

    /// URL had already been admitted by another worker or occurrence
    DuplicateUrl,

    /// Body matched the digest of a page already accepted
    DuplicateContent,
}

impl UrlState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Claimed | Self::Fetched)
    }

    /// Returns true if this represents a saved page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns true if moving from `self` to `next` is legal
    ///
    /// ```text
    /// Pending -> Claimed -> Fetched -> Accepted
    ///    |          |          `---> DuplicateContent
    ///    |          `--------------> FetchFailed
    ///    `-------------------------> DuplicateUrl
    /// ```
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Claimed)
                | (Self::Pending, Self::DuplicateUrl)
                | (Self::Claimed, Self::Fetched)
                | (Self::Claimed, Self::FetchFailed)
                | (Self::Fetched, Self::Accepted)
                | (Self::Fetched, Self::DuplicateContent)
        )
    }

    /// Returns the lowercase label used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Fetched => "fetched",
            Self::Accepted => "accepted",
            Self::FetchFailed => "fetch_failed",
            Self::DuplicateUrl => "duplicate_url",
            Self::DuplicateContent => "duplicate_content",
        }
    }

    /// Returns all possible URL states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Claimed,
            Self::Fetched,
            Self::Accepted,
            Self::FetchFailed,
            Self::DuplicateUrl,
            Self::DuplicateContent,
        ]
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Walks one URL through the state machine
#[derive(Debug)]
pub struct UrlTracker<'a> {
    url: &'a PageUrl,
    state: UrlState,
}

impl<'a> UrlTracker<'a> {
    /// Starts tracking `url` in `Pending`
    pub fn new(url: &'a PageUrl) -> Self {
        Self {
            url,
            state: UrlState::Pending,
        }
    }

    /// Current state
    pub fn state(&self) -> UrlState {
        self.state
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn advance(&mut self, next: UrlState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!UrlState::Pending.is_terminal());
        assert!(!UrlState::Claimed.is_terminal());
        assert!(!UrlState::Fetched.is_terminal());

        assert!(UrlState::Accepted.is_terminal());
        assert!(UrlState::FetchFailed.is_terminal());
        assert!(UrlState::DuplicateUrl.is_terminal());
        assert!(UrlState::DuplicateContent.is_terminal());
    }

    #[test]
    fn test_is_success() {
        assert!(UrlState::Accepted.is_success());
        assert!(!UrlState::DuplicateContent.is_success());
        assert!(!UrlState::FetchFailed.is_success());
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in UrlState::all_states().into_iter().filter(UrlState::is_terminal) {
            for to in UrlState::all_states() {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_every_active_state_reaches_a_terminal() {
        for from in UrlState::all_states()
            .into_iter()
            .filter(|s| !s.is_terminal())
        {
            assert!(
                UrlState::all_states()
                    .into_iter()
                    .any(|to| from.can_transition_to(to)),
                "{from} is a dead end"
            );
        }
    }

    #[test]
    fn test_cannot_skip_fetch() {
        assert!(!UrlState::Claimed.can_transition_to(UrlState::Accepted));
        assert!(!UrlState::Pending.can_transition_to(UrlState::Fetched));
        assert!(!UrlState::Claimed.can_transition_to(UrlState::DuplicateContent));
    }

    #[test]
    fn test_tracker_happy_path() {
        let url = PageUrl::parse("https://example.com/movie").unwrap();
        let mut tracker = UrlTracker::new(&url);
        tracker.advance(UrlState::Claimed).unwrap();
        tracker.advance(UrlState::Fetched).unwrap();
        tracker.advance(UrlState::Accepted).unwrap();
        assert_eq!(tracker.state(), UrlState::Accepted);
    }

    #[test]
    fn test_tracker_rejects_illegal_step() {
        let url = PageUrl::parse("https://example.com/movie").unwrap();
        let mut tracker = UrlTracker::new(&url);
        let err = tracker.advance(UrlState::Accepted).unwrap_err();
        assert!(matches!(
            err,
            HarvestError::InvalidTransition {
                from: UrlState::Pending,
                to: UrlState::Accepted
            }
        ));
        assert_eq!(tracker.state(), UrlState::Pending);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UrlState::Pending), "pending");
        assert_eq!(format!("{}", UrlState::DuplicateContent), "duplicate_content");
    }
}
