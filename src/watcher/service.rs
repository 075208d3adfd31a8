//! BreadcrumbService: the navigation state machine
//!
//! Each navigation bumps a generation counter. Every continuation (after
//! the grace delay, after each collaborator call, and inside detector
//! callbacks) checks it first, so a superseded navigation never touches
//! the current one's state.

use super::events::BreadcrumbsCleared;
use super::state::{ClearReason, NavigationOutcome, WatchState};
use crate::bridge::{CookieStore, DetectionCallback, PresenceDetector, Subscription};
use crate::config::{BreadcrumbConfig, DEFAULT_COOKIE_EXPIRY_DAYS};
use crate::storage::{PageState, TrailStore};
use crate::trail::{BreadcrumbItem, TrailBuilder};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Mutable state shared between navigation tasks and detector callbacks.
#[derive(Debug, Default)]
struct Coordination {
    generation: u64,
    present: bool,
    state: WatchState,
    location: Option<String>,
    trail: Vec<BreadcrumbItem>,
    observation: Option<Subscription>,
}

struct Inner {
    config: BreadcrumbConfig,
    builder: TrailBuilder,
    detector: Arc<dyn PresenceDetector>,
    store: TrailStore,
    coordination: Mutex<Coordination>,
    cleared: broadcast::Sender<BreadcrumbsCleared>,
}

impl Inner {
    fn coordination(&self) -> MutexGuard<'_, Coordination> {
        self.coordination.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Detector callback target. Ignored once a newer navigation started.
    fn element_detected(&self, generation: u64) {
        let mut coord = self.coordination();
        if coord.generation != generation {
            tracing::debug!(generation, current = coord.generation, "ignoring stale detection");
            return;
        }
        tracing::info!(generation, "breadcrumbs element detected");
        coord.present = true;
    }
}

/// Watches navigation and keeps persisted breadcrumbs in step with the page.
///
/// Cheap to clone; clones share the same state. Public operations never
/// fail: collaborator errors are logged and replaced by a benign default.
#[derive(Clone)]
pub struct BreadcrumbService {
    inner: Arc<Inner>,
}

impl BreadcrumbService {
    pub fn new(detector: Arc<dyn PresenceDetector>, cookies: Arc<dyn CookieStore>) -> Self {
        Self::with_config(BreadcrumbConfig::default(), detector, cookies)
    }

    /// A `cookie_expiry_days` below 1 (only reachable through the builder
    /// methods, the parsers reject it) falls back to the default.
    pub fn with_config(
        mut config: BreadcrumbConfig,
        detector: Arc<dyn PresenceDetector>,
        cookies: Arc<dyn CookieStore>,
    ) -> Self {
        if config.cookie_expiry_days < 1 {
            tracing::warn!(
                cookie_expiry_days = config.cookie_expiry_days,
                "cookie expiry must be at least one day, using default"
            );
            config.cookie_expiry_days = DEFAULT_COOKIE_EXPIRY_DAYS;
        }
        let (cleared, _) = broadcast::channel(config.notification_capacity.max(1));
        let inner = Inner {
            builder: TrailBuilder::new(config.home_title.as_str()),
            store: TrailStore::new(cookies, config.cookie_expiry_days),
            detector,
            coordination: Mutex::new(Coordination::default()),
            cleared,
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn config(&self) -> &BreadcrumbConfig {
        &self.inner.config
    }

    /// Subscribe to "breadcrumbs cleared" notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<BreadcrumbsCleared> {
        self.inner.cleared.subscribe()
    }

    // === Navigation ===

    /// Handle a location change to completion.
    pub async fn handle_navigation(&self, uri: &str) -> NavigationOutcome {
        let generation = self.begin_navigation(uri);

        tokio::time::sleep(self.inner.config.grace_period()).await;
        if !self.is_current(generation) {
            return self.superseded(generation);
        }

        self.start_observing(generation).await;

        let present = self.is_breadcrumbs_component_present().await;
        if !self.is_current(generation) {
            return self.superseded(generation);
        }

        if !present {
            tracing::info!(generation, "breadcrumbs component not present, clearing");
            self.clear_breadcrumbs_cookies().await;
            {
                let mut coord = self.inner.coordination();
                if coord.generation != generation {
                    drop(coord);
                    return self.superseded(generation);
                }
                coord.present = false;
                coord.state = WatchState::Absent;
            }
            self.notify_cleared();
            return NavigationOutcome::Cleared(ClearReason::Absent);
        }

        let confirmed = {
            let mut coord = self.inner.coordination();
            if coord.generation != generation {
                drop(coord);
                return self.superseded(generation);
            }
            coord.state = WatchState::Present;
            coord.present
        };
        if confirmed {
            tracing::debug!(generation, "breadcrumbs component present and confirmed");
            return NavigationOutcome::Confirmed;
        }

        tracing::info!(generation, "breadcrumbs component present but unconfirmed, clearing");
        self.clear_breadcrumbs_cookies().await;
        if !self.is_current(generation) {
            return self.superseded(generation);
        }
        self.notify_cleared();
        NavigationOutcome::Cleared(ClearReason::Unconfirmed)
    }

    /// Handle a location change on its own task.
    pub fn navigate(&self, uri: impl Into<String>) -> JoinHandle<NavigationOutcome> {
        let service = self.clone();
        let uri = uri.into();
        tokio::spawn(async move { service.handle_navigation(&uri).await })
    }

    /// Consume location-change notifications until the sender goes away,
    /// spawning one navigation task per location.
    pub fn watch_locations(&self, mut locations: mpsc::UnboundedReceiver<String>) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            while let Some(uri) = locations.recv().await {
                drop(service.navigate(uri));
            }
            tracing::debug!("location stream closed");
        })
    }

    fn begin_navigation(&self, uri: &str) -> u64 {
        let trail = self.inner.builder.build(uri);
        let mut coord = self.inner.coordination();
        coord.generation += 1;
        coord.present = false;
        coord.state = WatchState::Watching;
        coord.location = Some(uri.to_string());
        coord.trail = trail;
        if let Some(previous) = coord.observation.take() {
            if previous.cancel() {
                tracing::debug!(generation = coord.generation, "cancelled previous observation");
            }
        }
        tracing::info!(generation = coord.generation, location = uri, "location changed");
        coord.generation
    }

    async fn start_observing(&self, generation: u64) {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let on_detected: DetectionCallback = Box::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.element_detected(generation);
            }
        });

        match self.inner.detector.observe_start(on_detected).await {
            Ok(subscription) => {
                let mut coord = self.inner.coordination();
                if coord.generation == generation {
                    if let Some(previous) = coord.observation.replace(subscription) {
                        previous.cancel();
                    }
                } else {
                    subscription.cancel();
                }
            }
            Err(e) => {
                tracing::warn!(
                    generation,
                    element_id = %self.inner.config.element_id,
                    error = %e,
                    "failed to start observing breadcrumbs element"
                );
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.coordination().generation == generation
    }

    fn superseded(&self, generation: u64) -> NavigationOutcome {
        tracing::debug!(generation, "navigation superseded");
        NavigationOutcome::Superseded
    }

    fn notify_cleared(&self) {
        if self.inner.cleared.send(BreadcrumbsCleared).is_err() {
            tracing::debug!("breadcrumbs cleared with no subscribers");
        }
    }

    // === Presence ===

    /// Ask the detector whether the element is in the page right now.
    ///
    /// Detector failures count as "not present".
    pub async fn is_breadcrumbs_component_present(&self) -> bool {
        match self.inner.detector.check_presence().await {
            Ok(present) => {
                tracing::debug!(present, "breadcrumbs component presence");
                present
            }
            Err(e) => {
                tracing::warn!(error = %e, "presence check failed, treating as absent");
                false
            }
        }
    }

    /// Called by the breadcrumb component when it renders.
    pub fn register_breadcrumb(&self) {
        tracing::debug!("breadcrumb registered");
        self.inner.coordination().present = true;
    }

    pub fn reset_breadcrumb_presence(&self) {
        tracing::debug!("breadcrumb presence reset");
        self.inner.coordination().present = false;
    }

    /// Current value of the presence flag.
    pub fn breadcrumb_present(&self) -> bool {
        self.inner.coordination().present
    }

    pub fn state(&self) -> WatchState {
        self.inner.coordination().state
    }

    /// Number of navigations seen so far.
    pub fn generation(&self) -> u64 {
        self.inner.coordination().generation
    }

    pub fn current_location(&self) -> Option<String> {
        self.inner.coordination().location.clone()
    }

    /// Trail derived from the latest navigation.
    pub fn current_trail(&self) -> Vec<BreadcrumbItem> {
        self.inner.coordination().trail.clone()
    }

    // === Trails and persistence ===

    pub fn get_breadcrumb_items(&self, uri: &str) -> Vec<BreadcrumbItem> {
        self.inner.builder.build(uri)
    }

    pub async fn save_breadcrumbs_to_cookies(&self, page_uri: &str, items: &[BreadcrumbItem]) {
        tracing::debug!(page_uri, count = items.len(), "saving breadcrumbs");
        if let Err(e) = self.inner.store.save_trail(page_uri, items).await {
            tracing::warn!(page_uri, error = %e, "failed to save breadcrumbs");
        }
    }

    /// Empty when nothing usable is stored.
    pub async fn load_breadcrumbs_from_cookies(&self, page_uri: &str) -> Vec<BreadcrumbItem> {
        tracing::debug!(page_uri, "loading breadcrumbs");
        self.inner.store.load_trail(page_uri).await.unwrap_or_else(|e| {
            tracing::warn!(page_uri, error = %e, "failed to load breadcrumbs");
            Vec::new()
        })
    }

    pub async fn save_page_state(&self, page_uri: &str, state: &PageState) {
        tracing::debug!(page_uri, keys = state.len(), "saving page state");
        if let Err(e) = self.inner.store.save_page_state(page_uri, state).await {
            tracing::warn!(page_uri, error = %e, "failed to save page state");
        }
    }

    /// Empty when nothing usable is stored.
    pub async fn load_page_state(&self, page_uri: &str) -> PageState {
        tracing::debug!(page_uri, "loading page state");
        self.inner.store.load_page_state(page_uri).await.unwrap_or_else(|e| {
            tracing::warn!(page_uri, error = %e, "failed to load page state");
            PageState::new()
        })
    }

    /// Remove persisted trails. Idempotent.
    pub async fn clear_breadcrumbs_cookies(&self) {
        tracing::debug!("clearing breadcrumb cookies");
        if let Err(e) = self.inner.store.clear_trails().await {
            tracing::warn!(error = %e, "failed to clear breadcrumb cookies");
        }
    }
}

impl std::fmt::Debug for BreadcrumbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coord = self.inner.coordination();
        f.debug_struct("BreadcrumbService")
            .field("generation", &coord.generation)
            .field("present", &coord.present)
            .field("state", &coord.state)
            .field("location", &coord.location)
            .finish()
    }
}
