//! Harness configuration.
//!
//! Settings come from an optional `convtb.toml` in the working directory;
//! every field has a default so the file may be absent or partial. Command
//! line options are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TbError;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "convtb.toml";

/// Tunable parameters of a harness run.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Half-cycle step after which reset is released.
    pub end_of_reset_time: u64,
    /// Stall budget in cycles before the watchdog trips.
    pub watchdog_timeout: u64,
    /// Grace period in cycles after the last check fires.
    pub end_of_test_timeout: u64,
    /// Hard ceiling on simulated clock cycles.
    pub max_cycles: u64,
    /// Whether to record a VCD waveform of the run.
    pub record_waveform: bool,
    /// Output path for the waveform file.
    pub waveform_path: PathBuf,
    /// Seed for randomized stimulus and backpressure; `None` means the
    /// caller picks one.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            end_of_reset_time: 5,
            watchdog_timeout: 100,
            end_of_test_timeout: 10,
            max_cycles: 2_000_000,
            record_waveform: true,
            waveform_path: PathBuf::from("logs/waves.vcd"),
            seed: None,
        }
    }
}

impl HarnessConfig {
    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), TbError> {
        if self.max_cycles == 0 {
            return Err(TbError::Config {
                reason: "max_cycles must be non-zero".into(),
            });
        }
        if self.end_of_reset_time / 2 >= self.max_cycles {
            return Err(TbError::Config {
                reason: format!(
                    "reset window ({} steps) exceeds max_cycles ({})",
                    self.end_of_reset_time, self.max_cycles
                ),
            });
        }
        Ok(())
    }
}

/// Loads the configuration from `convtb.toml` in the given directory.
///
/// A missing file yields the defaults; a present but malformed file is an
/// error.
pub fn load_config(dir: &Path) -> Result<HarnessConfig, TbError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(HarnessConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| TbError::Config {
        reason: format!("cannot read {}: {e}", path.display()),
    })?;
    load_config_from_str(&text)
}

/// Parses a configuration from TOML text.
pub fn load_config_from_str(text: &str) -> Result<HarnessConfig, TbError> {
    let config: HarnessConfig = toml::from_str(text).map_err(|e| TbError::Config {
        reason: format!("invalid {CONFIG_FILE}: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bench_constants() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.end_of_reset_time, 5);
        assert_eq!(cfg.watchdog_timeout, 100);
        assert_eq!(cfg.end_of_test_timeout, 10);
        assert_eq!(cfg.max_cycles, 2_000_000);
        assert!(cfg.record_waveform);
        assert_eq!(cfg.waveform_path, PathBuf::from("logs/waves.vcd"));
        assert_eq!(cfg.seed, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg, HarnessConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let cfg = load_config_from_str("watchdog_timeout = 50\nseed = 7\n").unwrap();
        assert_eq!(cfg.watchdog_timeout, 50);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.max_cycles, 2_000_000);
    }

    #[test]
    fn file_in_directory_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "max_cycles = 1000\nrecord_waveform = false\n",
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.max_cycles, 1000);
        assert!(!cfg.record_waveform);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = load_config_from_str("wathcdog_timeout = 50\n").unwrap_err();
        assert!(matches!(err, TbError::Config { .. }));
    }

    #[test]
    fn zero_max_cycles_rejected() {
        let err = load_config_from_str("max_cycles = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_cycles"));
    }

    #[test]
    fn reset_longer_than_run_rejected() {
        let cfg = HarnessConfig {
            end_of_reset_time: 100,
            max_cycles: 10,
            ..HarnessConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
