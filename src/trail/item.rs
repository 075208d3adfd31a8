//! A single breadcrumb

use serde::{Deserialize, Serialize};

/// URL the Home item always points at.
pub const HOME_URL: &str = "/";

/// One step of a breadcrumb trail.
///
/// Serialized with `Title` / `Url` keys, the shape the browser-side
/// breadcrumb component reads back out of the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Url")]
    pub url: String,
}

impl BreadcrumbItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Root item of every trail.
    pub fn home(title: impl Into<String>) -> Self {
        Self::new(title, HOME_URL)
    }
}
