//! Browser-side collaborators
//!
//! The service reaches the page through two traits: a presence detector
//! watching the DOM for the breadcrumb element, and a cookie store. Hosts
//! implement them over their interop layer; the in-memory versions here
//! serve headless hosts and tests.

mod cookies;
mod detector;
mod subscription;
mod traits;

pub use cookies::MemoryCookieJar;
pub use detector::MemoryDetector;
pub use subscription::Subscription;
pub use traits::{BridgeError, BridgeResult, CookieStore, DetectionCallback, PresenceDetector};
