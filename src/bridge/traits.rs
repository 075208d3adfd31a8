//! Collaborator contracts

use super::subscription::Subscription;
use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to the browser layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The page or interop runtime is gone (e.g. disconnected circuit)
    #[error("bridge unavailable: {0}")]
    Unavailable(String),
    /// The call reached the page but failed there
    #[error("bridge call {call} failed: {message}")]
    Invocation { call: String, message: String },
}

impl BridgeError {
    pub fn invocation(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            call: call.into(),
            message: message.into(),
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Invoked at most once, when the watched element appears.
pub type DetectionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Watches the document for the breadcrumb element.
#[async_trait]
pub trait PresenceDetector: Send + Sync {
    /// Begin watching for the element to appear.
    ///
    /// The callback fires once on the first appearance, after which the
    /// observation stops. Cancelling the returned subscription first
    /// suppresses it.
    async fn observe_start(&self, on_detected: DetectionCallback) -> BridgeResult<Subscription>;

    /// Whether the element exists right now.
    async fn check_presence(&self) -> BridgeResult<bool>;
}

/// Keyed string storage with day-granular expiry.
#[async_trait]
pub trait CookieStore: Send + Sync {
    async fn set_cookie(&self, name: &str, value: &str, days: i64) -> BridgeResult<()>;

    /// `None` when the cookie is missing or expired.
    async fn get_cookie(&self, name: &str) -> BridgeResult<Option<String>>;

    /// Remove a cookie. Deleting a missing cookie succeeds.
    async fn delete_cookie(&self, name: &str) -> BridgeResult<()>;
}
