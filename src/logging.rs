//! Log output setup
//!
//! The library only emits `tracing` events. Hosts that have no subscriber
//! of their own can install a plain fmt one here.

use tracing_subscriber::fmt;

/// Install a global fmt subscriber at `max_level`.
///
/// Returns `false` when a global subscriber was already set; calling it
/// more than once is harmless.
pub fn init_logging(max_level: tracing::Level) -> bool {
    fmt().with_max_level(max_level).with_target(true).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_noop() {
        init_logging(tracing::Level::DEBUG);
        assert!(!init_logging(tracing::Level::INFO));
    }
}
