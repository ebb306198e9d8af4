//! Log verbosity levels ordered from least to most verbose.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The verbosity level of testbench logging.
///
/// Ordered from `None` (errors only) to `Debug` (everything), matching the
/// derived `PartialOrd`/`Ord` implementation based on declaration order.
/// A message is emitted when its level is less than or equal to the
/// configured level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum LogLevel {
    /// Suppress everything except errors.
    None,
    /// Major test phases only.
    Low,
    /// Test progress messages.
    Medium,
    /// Per-transaction messages.
    High,
    /// Per-cycle messages.
    Full,
    /// Internal harness tracing.
    Debug,
}

/// Error returned when a log-level string cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unknown log level '{0}' (expected none|low|medium|high|full|debug)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(LogLevel::None),
            "low" => Ok(LogLevel::Low),
            "medium" => Ok(LogLevel::Medium),
            "high" => Ok(LogLevel::High),
            "full" => Ok(LogLevel::Full),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::None => write!(f, "none"),
            LogLevel::Low => write!(f, "low"),
            LogLevel::Medium => write!(f, "medium"),
            LogLevel::High => write!(f, "high"),
            LogLevel::Full => write!(f, "full"),
            LogLevel::Debug => write!(f, "debug"),
        }
    }
}
