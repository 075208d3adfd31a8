//! Shared fixtures for crumbtrail integration tests

use crumbtrail::{BreadcrumbConfig, BreadcrumbService, MemoryCookieJar, MemoryDetector};
use std::sync::Arc;

/// A service wired to in-memory collaborators the test can poke at.
pub struct Page {
    pub detector: Arc<MemoryDetector>,
    pub jar: Arc<MemoryCookieJar>,
    pub service: BreadcrumbService,
}

impl Page {
    pub fn new() -> Self {
        Self::with_config(BreadcrumbConfig::default())
    }

    pub fn with_config(config: BreadcrumbConfig) -> Self {
        let detector = Arc::new(MemoryDetector::new(config.element_id.clone()));
        let jar = Arc::new(MemoryCookieJar::new());
        let service = BreadcrumbService::with_config(config, detector.clone(), jar.clone());
        Self {
            detector,
            jar,
            service,
        }
    }

    /// A page that renders the breadcrumb element.
    pub fn with_breadcrumbs() -> Self {
        let page = Self::new();
        page.detector.set_present(true);
        page
    }
}
