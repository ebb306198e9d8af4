//! Half-cycle simulation clock and reset generation.
//!
//! [`SimClock`] is the explicit time context shared by every component:
//! the orchestrator owns it, ticks it twice per clock cycle, and passes it
//! by handle wherever the current time is needed. Keeping it explicit
//! (rather than ambient global state) lets the engine be exercised with a
//! hand-stepped clock in unit tests.

use crate::ports::DutPorts;

/// Discrete half-cycle clock with an active-low reset window.
///
/// Time is counted in half-cycles ("steps"); a full clock cycle is two
/// steps. Reset is asserted for steps in the open interval
/// `(1, end_of_reset)`, a short power-on pulse before stimulus starts.
#[derive(Debug)]
pub struct SimClock {
    time: u64,
    cycles: u64,
    clk: bool,
    end_of_reset: u64,
}

impl SimClock {
    /// Creates a clock at time zero with the clock line low.
    ///
    /// `end_of_reset` is the half-cycle step after which reset is released
    /// and active-edge processing may begin.
    pub fn new(end_of_reset: u64) -> Self {
        Self {
            time: 0,
            cycles: 0,
            clk: false,
            end_of_reset,
        }
    }

    /// Toggles the clock line. Called once per half-cycle.
    pub fn toggle(&mut self) {
        self.clk = !self.clk;
    }

    /// Writes the clock and reset lines onto the DUT ports.
    pub fn apply(&self, ports: &mut DutPorts) {
        ports.clk = self.clk;
        ports.rst_n = !self.in_reset();
    }

    /// Whether reset is currently asserted.
    pub fn in_reset(&self) -> bool {
        self.time > 1 && self.time < self.end_of_reset
    }

    /// Whether this half-cycle is a post-reset active (high) clock phase.
    pub fn active_edge(&self) -> bool {
        self.clk && self.time > self.end_of_reset
    }

    /// Advances to the next half-cycle, counting a completed cycle on each
    /// high phase.
    pub fn advance(&mut self) {
        if self.clk {
            self.cycles += 1;
        }
        self.time += 1;
    }

    /// Current time in half-cycle steps.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Number of completed clock cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Current clock line level.
    pub fn level(&self) -> bool {
        self.clk
    }
}
