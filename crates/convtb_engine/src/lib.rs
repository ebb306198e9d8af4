//! Cycle-accurate verification engine for the CONV1D accelerator.
//!
//! The engine mirrors a classic directed testbench: a [`Driver`] serializes
//! transactions onto the DUT's wires, passive monitors observe handshakes
//! and responses, a [`Scoreboard`] matches deferred expectations against
//! responses, and a [`Harness`] orchestrates the whole run under a
//! [`Watchdog`] and a hard cycle ceiling, optionally recording a VCD
//! waveform.
//!
//! The device under test is anything implementing [`DutModel`];
//! [`Conv1dModel`] is the bundled behavioral reference.

#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod harness;
pub mod model;
pub mod monitor;
pub mod ports;
pub mod program;
pub mod scoreboard;
pub mod txn;
pub mod watchdog;
pub mod waveform;

pub use clock::SimClock;
pub use config::{load_config, load_config_from_str, HarnessConfig, CONFIG_FILE};
pub use driver::Driver;
pub use error::TbError;
pub use harness::{run_simulation, Harness, TestOutcome, TestReport};
pub use model::Conv1dModel;
pub use monitor::{RequestMonitor, ResponseMonitor};
pub use ports::{DutModel, DutPorts};
pub use program::{Conv1dProgram, CycleInputs, CycleOutputs, StimulusProgram};
pub use scoreboard::{Protocol, Scoreboard};
pub use txn::{ObiRequest, RegRequest};
pub use watchdog::Watchdog;
pub use waveform::{PortTracer, TraceId, VcdRecorder, WaveformRecorder};
