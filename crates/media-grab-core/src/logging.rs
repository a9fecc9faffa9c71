//! Leveled lifecycle logging.
//!
//! Workers receive an [`EventLogger`] at construction and report every event
//! they handle through it. Output goes to `tracing`; the level decides how much.

use crate::SourceId;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Verbosity of lifecycle logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Lifecycle events are not logged.
    None,
    /// One descriptive message per event.
    #[default]
    Low,
    /// Message plus the raw event payload.
    High,
}

/// Leveled sink for worker lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventLogger {
    level: LogLevel,
}

impl EventLogger {
    /// Creates a logger at `level`.
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Configured verbosity.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Logs `message` for `source_id`; at [`LogLevel::High`] the payload too.
    pub fn event<P: Debug + ?Sized>(&self, source_id: SourceId, message: &str, payload: &P) {
        if self.level >= LogLevel::Low {
            info!(source_id = %source_id, "{}", message);
        }
        if self.level >= LogLevel::High {
            debug!(source_id = %source_id, payload = ?payload, "{}", message);
        }
    }
}
