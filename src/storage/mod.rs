//! Cookie-backed persistence for trails and page state
//!
//! Everything is stored as JSON text through a [`CookieStore`](crate::bridge::CookieStore),
//! one cookie per page URI and kind.

mod keys;
mod store;

pub use keys::{state_key, trail_key, SHARED_TRAIL_KEY, STATE_SUFFIX, TRAIL_SUFFIX};
pub use store::{PageState, TrailStore};
