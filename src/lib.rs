//! crumbtrail: presence-aware breadcrumb trails
//!
//! Derives a breadcrumb trail from the current page location, persists it
//! (and arbitrary page state) in cookies, and watches navigation so that the
//! persisted trail is dropped once the user leaves a page that shows
//! breadcrumbs.
//!
//! # Core Concepts
//!
//! - **Trail**: ordered `(title, url)` items from `Home` down to the current page
//! - **Presence**: whether the breadcrumb element is in the rendered page
//! - **Bridge**: the browser-side detector and cookie store, behind traits
//!
//! # Example
//!
//! ```
//! use crumbtrail::{get_breadcrumb_items, BreadcrumbItem};
//!
//! let trail = get_breadcrumb_items("/guide/setup");
//! assert_eq!(trail[0], BreadcrumbItem::new("Home", "/"));
//! assert_eq!(trail[2].url, "/guide/setup/");
//! ```

pub mod bridge;
pub mod config;
mod error;
pub mod logging;
pub mod storage;
mod trail;
mod watcher;

pub use bridge::{
    BridgeError, BridgeResult, CookieStore, DetectionCallback, MemoryCookieJar, MemoryDetector,
    PresenceDetector, Subscription,
};
pub use config::BreadcrumbConfig;
pub use error::{BreadcrumbError, BreadcrumbResult};
pub use logging::init_logging;
pub use storage::{PageState, TrailStore};
pub use trail::{get_breadcrumb_items, path_component, BreadcrumbItem, TrailBuilder, HOME_URL};
pub use watcher::{BreadcrumbService, BreadcrumbsCleared, ClearReason, NavigationOutcome, WatchState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
