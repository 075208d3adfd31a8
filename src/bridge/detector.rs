//! Scriptable presence detector
//!
//! Stands in for the page's mutation observer. The host (or a test) flips
//! presence with [`MemoryDetector::set_present`]; every live observation is
//! notified once and then dropped, as a mutation observer that disconnects
//! after its first hit.

use super::subscription::Subscription;
use super::traits::{BridgeError, BridgeResult, DetectionCallback, PresenceDetector};
use crate::config::DEFAULT_ELEMENT_ID;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MemoryDetector {
    element_id: String,
    present: AtomicBool,
    failing: AtomicBool,
    observers: Mutex<Vec<(Subscription, DetectionCallback)>>,
    observe_calls: AtomicUsize,
    check_calls: AtomicUsize,
}

impl MemoryDetector {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            present: AtomicBool::new(false),
            failing: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
            observe_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Update whether the element is in the document.
    ///
    /// Setting it present counts as a DOM mutation: every live observation
    /// fires and is dropped.
    pub fn set_present(&self, present: bool) {
        self.present.store(present, Ordering::SeqCst);
        if !present {
            return;
        }
        let pending = match self.observers.lock() {
            Ok(mut observers) => std::mem::take(&mut *observers),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for (subscription, on_detected) in pending {
            if subscription.is_cancelled() {
                continue;
            }
            tracing::debug!(element_id = %self.element_id, "element detected in document");
            on_detected();
        }
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Observations still waiting for the element.
    pub fn live_observers(&self) -> usize {
        match self.observers.lock() {
            Ok(observers) => observers.iter().filter(|(s, _)| !s.is_cancelled()).count(),
            Err(_) => 0,
        }
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    fn check_failing(&self, call: &str) -> BridgeResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BridgeError::invocation(call, "detector configured to fail"));
        }
        Ok(())
    }
}

impl Default for MemoryDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ELEMENT_ID)
    }
}

impl std::fmt::Debug for MemoryDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDetector")
            .field("element_id", &self.element_id)
            .field("present", &self.present.load(Ordering::SeqCst))
            .field("live_observers", &self.live_observers())
            .finish()
    }
}

#[async_trait]
impl PresenceDetector for MemoryDetector {
    async fn observe_start(&self, on_detected: DetectionCallback) -> BridgeResult<Subscription> {
        self.observe_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing("observe_start")?;

        let subscription = Subscription::new();
        let mut observers = self
            .observers
            .lock()
            .map_err(|_| BridgeError::invocation("observe_start", "observer list poisoned"))?;
        observers.retain(|(s, _)| !s.is_cancelled());
        observers.push((subscription.clone(), on_detected));
        Ok(subscription)
    }

    async fn check_presence(&self) -> BridgeResult<bool> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing("check_presence")?;
        let present = self.present.load(Ordering::SeqCst);
        tracing::debug!(element_id = %self.element_id, present, "checked element presence");
        Ok(present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, DetectionCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let clone = hits.clone();
        (hits, Box::new(move || {
            clone.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[tokio::test]
    async fn check_reflects_presence() {
        let detector = MemoryDetector::default();
        assert!(!detector.check_presence().await.unwrap());
        detector.set_present(true);
        assert!(detector.check_presence().await.unwrap());
        assert_eq!(detector.check_calls(), 2);
    }

    #[tokio::test]
    async fn observer_fires_once_on_appearance() {
        let detector = MemoryDetector::default();
        let (hits, callback) = counter();
        detector.observe_start(callback).await.unwrap();
        assert_eq!(detector.live_observers(), 1);

        detector.set_present(true);
        detector.set_present(false);
        detector.set_present(true);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(detector.live_observers(), 0);
    }

    #[tokio::test]
    async fn cancelled_observer_never_fires() {
        let detector = MemoryDetector::default();
        let (hits, callback) = counter();
        let subscription = detector.observe_start(callback).await.unwrap();
        subscription.cancel();
        assert_eq!(detector.live_observers(), 0);

        detector.set_present(true);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absence_does_not_fire() {
        let detector = MemoryDetector::default();
        let (hits, callback) = counter();
        detector.observe_start(callback).await.unwrap();
        detector.set_present(false);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(detector.live_observers(), 1);
    }

    #[tokio::test]
    async fn failing_detector_errors() {
        let detector = MemoryDetector::default();
        detector.set_failing(true);
        let (_, callback) = counter();
        assert!(detector.observe_start(callback).await.is_err());
        assert!(matches!(
            detector.check_presence().await,
            Err(BridgeError::Invocation { .. })
        ));
        assert_eq!(detector.observe_calls(), 1);
    }
}
