/// Lifecycle definitions for a single crawl
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Config validated, frontier seeded, nothing fetched yet
    Init,

    /// The fetch → extract → scope → select → enqueue loop is running
    Running,

    /// The loop has terminated; results go to the indexing sink
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// The only legal path is `Init → Running → Done`. Staying in place is
    /// not a transition.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Running) | (Self::Running, Self::Done)
        )
    }

    /// Returns true once the crawl can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Done => "done",
        };
        write!(f, "{}", s)
    }
}

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Nothing left to visit
    FrontierExhausted,

    /// The visited set reached the page budget
    BudgetReached,

    /// The configured time limit elapsed
    DeadlineReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::BudgetReached => "page budget reached",
            Self::DeadlineReached => "time limit reached",
        };
        write!(f, "{}", s)
    }
}
