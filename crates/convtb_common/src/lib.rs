//! Shared primitives for the convtb verification harness.
//!
//! Holds the log-level type and the tagged console logger used by every
//! other crate in the workspace. Nothing in here knows about protocols,
//! scoreboards, or the DUT.

#![warn(missing_docs)]

pub mod log;
pub mod logger;

pub use log::LogLevel;
pub use logger::TbLogger;
