//! Navigation watching
//!
//! [`BreadcrumbService`] reacts to location changes: it resets presence,
//! waits for the page to settle, asks the detector whether the breadcrumb
//! element is there, and clears persisted trails when it is not.

mod events;
mod service;
mod state;


pub use events::BreadcrumbsCleared;
pub use service::BreadcrumbService;
pub use state::{ClearReason, NavigationOutcome, WatchState};
