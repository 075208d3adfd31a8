//! Trail derivation from a page location
//!
//! Only the path of the location matters: scheme, authority, query and
//! fragment are dropped before splitting. Segments are used verbatim as
//! titles; casing, percent-escapes and repeated segments are kept as-is.

use super::item::{BreadcrumbItem, HOME_URL};
use crate::config::DEFAULT_HOME_TITLE;

/// Builds trails with a configurable title for the root item.
#[derive(Debug, Clone)]
pub struct TrailBuilder {
    home_title: String,
}

impl TrailBuilder {
    pub fn new(home_title: impl Into<String>) -> Self {
        Self {
            home_title: home_title.into(),
        }
    }

    /// Derive the trail for `uri`, root first.
    pub fn build(&self, uri: &str) -> Vec<BreadcrumbItem> {
        let mut trail = vec![BreadcrumbItem::home(self.home_title.as_str())];
        if uri.is_empty() || uri == HOME_URL {
            return trail;
        }

        let mut url = String::from(HOME_URL);
        for segment in path_component(uri).split('/').filter(|s| !s.is_empty()) {
            url.push_str(segment);
            url.push('/');
            trail.push(BreadcrumbItem::new(segment, url.as_str()));
        }
        trail
    }
}

impl Default for TrailBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_TITLE)
    }
}

/// Derive the trail for `uri` with the default "Home" root.
pub fn get_breadcrumb_items(uri: &str) -> Vec<BreadcrumbItem> {
    TrailBuilder::default().build(uri)
}

/// The path part of an absolute or relative location.
///
/// `https://host/a/b?q=1#top` yields `/a/b`; a bare authority yields `""`.
/// A `://` later in the path, query or fragment is not a scheme separator.
pub fn path_component(uri: &str) -> &str {
    let rest = match after_scheme(uri) {
        Some(hierarchy) => strip_authority(hierarchy),
        None if uri.starts_with("//") => strip_authority(&uri[2..]),
        None => uri,
    };
    match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Text after `scheme://`, when `uri` opens with a valid scheme.
fn after_scheme(uri: &str) -> Option<&str> {
    let colon = uri.find(':')?;
    let mut scheme = uri[..colon].chars();
    let valid = scheme.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return None;
    }
    uri[colon + 1..].strip_prefix("//")
}

fn strip_authority(after_scheme: &str) -> &str {
    match after_scheme.find(['/', '?', '#']) {
        Some(idx) => &after_scheme[idx..],
        None => "",
    }
}
