//! Watcher states and per-navigation outcomes

use std::fmt;

/// Where the watcher is in handling the latest navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
    /// No navigation handled yet
    #[default]
    Unknown,
    /// Navigation seen, presence not yet decided
    Watching,
    /// Breadcrumb element found in the page
    Present,
    /// Breadcrumb element missing; trail cleared
    Absent,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Watching => "watching",
            Self::Present => "present",
            Self::Absent => "absent",
        };
        f.write_str(name)
    }
}

/// Why a navigation cleared the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// The element was not in the page (or the check failed)
    Absent,
    /// The element was in the page but nothing confirmed it for this navigation
    Unconfirmed,
}

/// Result of handling one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Element present and confirmed; trail kept
    Confirmed,
    /// Trail cleared and subscribers notified
    Cleared(ClearReason),
    /// A newer navigation took over before this one finished
    Superseded,
}

impl NavigationOutcome {
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared(_))
    }
}
