//! Error types shared across the crate

use crate::bridge::BridgeError;
use thiserror::Error;

/// Errors raised by the lower layers of crumbtrail.
///
/// The public service never returns these to its host; they are logged and
/// downgraded to a benign default at the service boundary.
#[derive(Debug, Error)]
pub enum BreadcrumbError {
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for crumbtrail operations
pub type BreadcrumbResult<T> = Result<T, BreadcrumbError>;
