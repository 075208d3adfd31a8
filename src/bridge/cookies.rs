//! In-memory cookie jar

use super::traits::{BridgeError, BridgeResult, CookieStore};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    /// `None` for session cookies
    expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A [`CookieStore`] kept in process memory.
///
/// Follows browser semantics for the `days` argument: positive values set an
/// expiry, zero makes a session cookie, negative values expire the cookie
/// immediately.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: DashMap<String, StoredCookie>,
    unavailable: AtomicBool,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`BridgeError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Number of live (unexpired) cookies.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.cookies.iter().filter(|c| !c.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of live cookies, sorted.
    pub fn names(&self) -> Vec<String> {
        let now = Utc::now();
        let mut names: Vec<String> = self
            .cookies
            .iter()
            .filter(|c| !c.is_expired(now))
            .map(|c| c.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Expiry of a stored cookie; `None` for session or missing cookies.
    pub fn expires_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.cookies.get(name).and_then(|c| c.expires_at)
    }

    /// Drop every cookie expired at `now`. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|_, c| !c.is_expired(now));
        before - self.cookies.len()
    }

    fn check_available(&self, call: &str) -> BridgeResult<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(BridgeError::Unavailable(format!("cookie jar offline during {call}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CookieStore for MemoryCookieJar {
    async fn set_cookie(&self, name: &str, value: &str, days: i64) -> BridgeResult<()> {
        self.check_available("set_cookie")?;
        tracing::debug!(cookie = name, days, "set cookie");
        if days < 0 {
            self.cookies.remove(name);
            return Ok(());
        }
        let expires_at = (days > 0).then(|| Utc::now() + Duration::days(days));
        self.cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get_cookie(&self, name: &str) -> BridgeResult<Option<String>> {
        self.check_available("get_cookie")?;
        let now = Utc::now();
        let value = match self.cookies.get(name) {
            Some(cookie) if !cookie.is_expired(now) => Some(cookie.value.clone()),
            _ => None,
        };
        tracing::debug!(cookie = name, found = value.is_some(), "get cookie");
        Ok(value)
    }

    async fn delete_cookie(&self, name: &str) -> BridgeResult<()> {
        self.check_available("delete_cookie")?;
        tracing::debug!(cookie = name, "delete cookie");
        self.cookies.remove(name);
        Ok(())
    }
}
