//! Cookie naming

/// Suffix appended to a page URI to name its trail cookie.
pub const TRAIL_SUFFIX: &str = "-breadcrumbs";

/// Suffix appended to a page URI to name its state cookie.
pub const STATE_SUFFIX: &str = "-state";

/// Page-independent trail cookie read by the breadcrumb component.
pub const SHARED_TRAIL_KEY: &str = "breadcrumbs";

pub fn trail_key(page_uri: &str) -> String {
    format!("{page_uri}{TRAIL_SUFFIX}")
}

pub fn state_key(page_uri: &str) -> String {
    format!("{page_uri}{STATE_SUFFIX}")
}
