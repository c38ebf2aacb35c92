/// Item state definitions for tracking crawl progress
///
/// Every item moves strictly forward:
/// `Frontier -> Fetching -> (Parsed | FetchFailed)`.
use std::fmt;

/// Represents the current state of a directory item in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    // ===== Active States =====
    /// Item was discovered and waits in the frontier
    Frontier,

    /// Item was moved to the visited set and its page is being fetched
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and run through the extractor
    Parsed,

    /// Page could not be fetched or decoded; the item contributes nothing
    FetchFailed,
}

impl ItemState {
    /// Returns true if no further crawl processing happens for this item
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Parsed | Self::FetchFailed)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: ItemState) -> bool {
        matches!(
            (self, next),
            (Self::Frontier, Self::Fetching)
                | (Self::Fetching, Self::Parsed)
                | (Self::Fetching, Self::FetchFailed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontier => "frontier",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!ItemState::Frontier.is_terminal());
        assert!(!ItemState::Fetching.is_terminal());
        assert!(ItemState::Parsed.is_terminal());
        assert!(ItemState::FetchFailed.is_terminal());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(ItemState::Frontier.can_transition_to(ItemState::Fetching));
        assert!(ItemState::Fetching.can_transition_to(ItemState::Parsed));
        assert!(ItemState::Fetching.can_transition_to(ItemState::FetchFailed));
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        for state in [
            ItemState::Frontier,
            ItemState::Fetching,
            ItemState::Parsed,
            ItemState::FetchFailed,
        ] {
            assert!(!state.can_transition_to(ItemState::Frontier));
        }
        assert!(!ItemState::Frontier.can_transition_to(ItemState::Parsed));
        assert!(!ItemState::Parsed.can_transition_to(ItemState::Fetching));
        assert!(!ItemState::FetchFailed.can_transition_to(ItemState::Parsed));
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemState::FetchFailed.to_string(), "fetch_failed");
        assert_eq!(ItemState::Parsed.to_string(), "parsed");
    }
}
