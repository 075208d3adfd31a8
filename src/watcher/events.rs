//! Notifications published to the host UI

/// Fired when the persisted trail should be considered invalid.
///
/// Carries no data; subscribers re-read whatever they display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreadcrumbsCleared;
