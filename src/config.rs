//! Service configuration
//!
//! Every field has a default, so an empty YAML or JSON document is a valid
//! configuration.

use crate::error::{BreadcrumbError, BreadcrumbResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between a navigation and the first presence query.
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 100;

/// DOM id of the breadcrumb display element.
pub const DEFAULT_ELEMENT_ID: &str = "breadcrumbs";

/// Lifetime of every cookie written by the persistence helpers.
pub const DEFAULT_COOKIE_EXPIRY_DAYS: i64 = 7;

pub const DEFAULT_HOME_TITLE: &str = "Home";

/// Buffered "cleared" notifications per subscriber before it starts lagging.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 16;

/// Tunables for [`BreadcrumbService`](crate::BreadcrumbService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfig {
    /// Grace period for the DOM to settle after a navigation
    pub grace_period_ms: u64,
    /// Element the presence detector looks for
    pub element_id: String,
    pub cookie_expiry_days: i64,
    /// Title of the root item of every trail
    pub home_title: String,
    pub notification_capacity: usize,
}

impl BreadcrumbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = element_id.into();
        self
    }

    pub fn with_cookie_expiry_days(mut self, days: i64) -> Self {
        self.cookie_expiry_days = days;
        self
    }

    pub fn with_home_title(mut self, title: impl Into<String>) -> Self {
        self.home_title = title.into();
        self
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(source: &str) -> BreadcrumbResult<Self> {
        let config: Self =
            serde_yaml::from_str(source).map_err(|e| BreadcrumbError::Config(e.to_string()))?;
        config.validate()
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> BreadcrumbResult<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|e| BreadcrumbError::Config(e.to_string()))?;
        config.validate()
    }

    fn validate(self) -> BreadcrumbResult<Self> {
        if self.element_id.is_empty() {
            return Err(BreadcrumbError::Config("element_id must not be empty".to_string()));
        }
        if self.cookie_expiry_days < 1 {
            return Err(BreadcrumbError::Config(format!(
                "cookie_expiry_days must be at least 1, got {}",
                self.cookie_expiry_days
            )));
        }
        if self.notification_capacity == 0 {
            return Err(BreadcrumbError::Config(
                "notification_capacity must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            element_id: DEFAULT_ELEMENT_ID.to_string(),
            cookie_expiry_days: DEFAULT_COOKIE_EXPIRY_DAYS,
            home_title: DEFAULT_HOME_TITLE.to_string(),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_browser_helper() {
        let config = BreadcrumbConfig::default();
        assert_eq!(config.grace_period(), Duration::from_millis(100));
        assert_eq!(config.element_id, "breadcrumbs");
        assert_eq!(config.cookie_expiry_days, 7);
        assert_eq!(config.home_title, "Home");
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = BreadcrumbConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, BreadcrumbConfig::default());
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let config = BreadcrumbConfig::from_yaml_str(
            "grace_period_ms: 250\nelement_id: crumbs\n",
        )
        .unwrap();
        assert_eq!(config.grace_period_ms, 250);
        assert_eq!(config.element_id, "crumbs");
        assert_eq!(config.cookie_expiry_days, 7);
    }

    #[test]
    fn json_config_parses() {
        let config = BreadcrumbConfig::from_json_str(r#"{"home_title": "Start"}"#).unwrap();
        assert_eq!(config.home_title, "Start");
    }

    #[test]
    fn empty_element_id_rejected() {
        let err = BreadcrumbConfig::from_json_str(r#"{"element_id": ""}"#).unwrap_err();
        assert!(matches!(err, BreadcrumbError::Config(_)));
    }

    #[test]
    fn non_positive_cookie_expiry_rejected() {
        for source in ["cookie_expiry_days: -1", "cookie_expiry_days: 0"] {
            let err = BreadcrumbConfig::from_yaml_str(source).unwrap_err();
            assert!(matches!(err, BreadcrumbError::Config(_)), "{source}");
        }
        let config = BreadcrumbConfig::from_yaml_str("cookie_expiry_days: 1").unwrap();
        assert_eq!(config.cookie_expiry_days, 1);
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = BreadcrumbConfig::from_yaml_str("grace_period_ms: [").unwrap_err();
        assert!(matches!(err, BreadcrumbError::Config(_)));
    }

    #[test]
    fn builder_sets_grace_period() {
        let config = BreadcrumbConfig::new().with_grace_period(Duration::from_millis(5));
        assert_eq!(config.grace_period_ms, 5);
    }

    #[test]
    fn oversized_grace_period_saturates() {
        let config = BreadcrumbConfig::new().with_grace_period(Duration::MAX);
        assert_eq!(config.grace_period_ms, u64::MAX);
    }
}
