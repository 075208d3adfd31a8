//! TrailStore: JSON-in-cookie persistence

use super::keys::{state_key, trail_key, SHARED_TRAIL_KEY};
use crate::bridge::CookieStore;
use crate::error::BreadcrumbResult;
use crate::trail::BreadcrumbItem;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Arbitrary per-page state, string-keyed.
pub type PageState = BTreeMap<String, serde_json::Value>;

/// Reads and writes trails and page state through a cookie store.
///
/// Remembers every trail key it has written so that [`clear_trails`](Self::clear_trails)
/// can remove them without enumerating the jar.
pub struct TrailStore {
    cookies: Arc<dyn CookieStore>,
    expiry_days: i64,
    written: Mutex<BTreeSet<String>>,
}

impl TrailStore {
    pub fn new(cookies: Arc<dyn CookieStore>, expiry_days: i64) -> Self {
        Self {
            cookies,
            expiry_days,
            written: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn expiry_days(&self) -> i64 {
        self.expiry_days
    }

    pub async fn save_trail(&self, page_uri: &str, items: &[BreadcrumbItem]) -> BreadcrumbResult<()> {
        let key = trail_key(page_uri);
        let json = serde_json::to_string(items)?;
        self.cookies.set_cookie(&key, &json, self.expiry_days).await?;
        if let Ok(mut written) = self.written.lock() {
            written.insert(key);
        }
        Ok(())
    }

    /// Missing, empty or `null` cookies load as an empty trail.
    pub async fn load_trail(&self, page_uri: &str) -> BreadcrumbResult<Vec<BreadcrumbItem>> {
        match self.cookies.get_cookie(&trail_key(page_uri)).await? {
            Some(json) if !json.is_empty() => {
                let items: Option<Vec<BreadcrumbItem>> = serde_json::from_str(&json)?;
                Ok(items.unwrap_or_default())
            }
            _ => Ok(Vec::new()),
        }
    }

    pub async fn save_page_state(&self, page_uri: &str, state: &PageState) -> BreadcrumbResult<()> {
        let json = serde_json::to_string(state)?;
        self.cookies
            .set_cookie(&state_key(page_uri), &json, self.expiry_days)
            .await?;
        Ok(())
    }

    /// Missing, empty or `null` cookies load as an empty map.
    pub async fn load_page_state(&self, page_uri: &str) -> BreadcrumbResult<PageState> {
        match self.cookies.get_cookie(&state_key(page_uri)).await? {
            Some(json) if !json.is_empty() => {
                let state: Option<PageState> = serde_json::from_str(&json)?;
                Ok(state.unwrap_or_default())
            }
            _ => Ok(PageState::new()),
        }
    }

    /// Delete the shared trail cookie and every trail this store wrote.
    ///
    /// Attempts every deletion; the first failure is returned afterwards.
    /// Keys whose deletion failed stay tracked for the next attempt.
    pub async fn clear_trails(&self) -> BreadcrumbResult<()> {
        let mut keys: Vec<String> = match self.written.lock() {
            Ok(written) => written.iter().cloned().collect(),
            Err(_) => Vec::new(),
        };
        keys.insert(0, SHARED_TRAIL_KEY.to_string());

        let mut first_error = None;
        for key in keys {
            match self.cookies.delete_cookie(&key).await {
                Ok(()) => {
                    if let Ok(mut written) = self.written.lock() {
                        written.remove(&key);
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "failed to delete trail cookie");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Trail keys written and not yet cleared.
    pub fn tracked_keys(&self) -> Vec<String> {
        match self.written.lock() {
            Ok(written) => written.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl std::fmt::Debug for TrailStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailStore")
            .field("expiry_days", &self.expiry_days)
            .field("tracked_keys", &self.tracked_keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryCookieJar;
    use crate::error::BreadcrumbError;
    use crate::trail::get_breadcrumb_items;
    use serde_json::json;

    fn store() -> (Arc<MemoryCookieJar>, TrailStore) {
        let jar = Arc::new(MemoryCookieJar::new());
        let store = TrailStore::new(jar.clone(), 7);
        (jar, store)
    }

    #[tokio::test]
    async fn trail_round_trip() {
        let (_, store) = store();
        let items = get_breadcrumb_items("/a/b/c");
        store.save_trail("/a/b/c", &items).await.unwrap();
        assert_eq!(store.load_trail("/a/b/c").await.unwrap(), items);
    }

    #[tokio::test]
    async fn trail_saved_under_suffixed_key_with_expiry() {
        let (jar, store) = store();
        let before = chrono::Utc::now();
        store.save_trail("/x", &get_breadcrumb_items("/x")).await.unwrap();
        assert_eq!(jar.names(), vec!["/x-breadcrumbs".to_string()]);

        let expires = jar.expires_at("/x-breadcrumbs").unwrap();
        assert!(expires >= before + chrono::Duration::days(store.expiry_days()));
        assert!(expires <= chrono::Utc::now() + chrono::Duration::days(store.expiry_days()));
    }

    #[tokio::test]
    async fn missing_and_empty_trail_load_empty() {
        let (jar, store) = store();
        assert!(store.load_trail("/none").await.unwrap().is_empty());
        jar.set_cookie("/blank-breadcrumbs", "", 7).await.unwrap();
        assert!(store.load_trail("/blank").await.unwrap().is_empty());
        jar.set_cookie("/null-breadcrumbs", "null", 7).await.unwrap();
        assert!(store.load_trail("/null").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_trail_is_serialization_error() {
        let (jar, store) = store();
        jar.set_cookie("/bad-breadcrumbs", "[{", 7).await.unwrap();
        let err = store.load_trail("/bad").await.unwrap_err();
        assert!(matches!(err, BreadcrumbError::Serialization(_)));
    }

    #[tokio::test]
    async fn page_state_round_trip() {
        let (jar, store) = store();
        let mut state = PageState::new();
        state.insert("scroll".to_string(), json!(420));
        state.insert("filters".to_string(), json!({"tag": "rust", "open": true}));

        store.save_page_state("/list", &state).await.unwrap();
        assert_eq!(store.load_page_state("/list").await.unwrap(), state);
        assert_eq!(jar.names(), vec!["/list-state".to_string()]);
    }

    #[tokio::test]
    async fn missing_page_state_is_empty() {
        let (_, store) = store();
        assert!(store.load_page_state("/fresh").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_written_trails_and_shared_key() {
        let (jar, store) = store();
        jar.set_cookie(SHARED_TRAIL_KEY, "[]", 7).await.unwrap();
        store.save_trail("/a", &get_breadcrumb_items("/a")).await.unwrap();
        store.save_trail("/b", &get_breadcrumb_items("/b")).await.unwrap();
        store.save_page_state("/a", &PageState::new()).await.unwrap();

        store.clear_trails().await.unwrap();
        assert_eq!(jar.names(), vec!["/a-state".to_string()]);
        assert!(store.tracked_keys().is_empty());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (jar, store) = store();
        store.save_trail("/a", &get_breadcrumb_items("/a")).await.unwrap();
        store.clear_trails().await.unwrap();
        assert!(jar.is_empty());
        store.clear_trails().await.unwrap();
        assert!(jar.is_empty());
    }

    #[tokio::test]
    async fn failed_clear_keeps_keys_tracked() {
        let (jar, store) = store();
        store.save_trail("/a", &get_breadcrumb_items("/a")).await.unwrap();
        jar.set_unavailable(true);
        assert!(matches!(
            store.clear_trails().await,
            Err(BreadcrumbError::Bridge(_))
        ));
        assert_eq!(store.tracked_keys(), vec!["/a-breadcrumbs".to_string()]);

        jar.set_unavailable(false);
        store.clear_trails().await.unwrap();
        assert!(jar.is_empty());
    }
}
