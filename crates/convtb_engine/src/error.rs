//! Error types for the verification engine.
//!
//! Only infrastructure failures are represented here. Protocol-level
//! problems — data mismatches, stalls, unmatched expectations — are test
//! *outcomes*, tracked by the scoreboard and reported through the final
//! classification, never as `Err` values.

use std::io;

/// Errors that can occur while setting up or running the harness.
#[derive(Debug, thiserror::Error)]
pub enum TbError {
    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),

    /// The harness configuration is invalid or could not be loaded.
    #[error("configuration error: {reason}")]
    Config {
        /// Description of what is wrong with the configuration.
        reason: String,
    },
}
