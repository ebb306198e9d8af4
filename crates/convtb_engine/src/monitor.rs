//! Passive observers of the DUT's handshake and response ports.
//!
//! Both monitors snapshot port state when `sample` is called and expose the
//! snapshot through accessors. Captured values are meaningful only for the
//! cycle they were sampled in; the orchestrator must consume them before
//! the next tick, mirroring the one-cycle validity of the underlying
//! protocols. Sampling twice without an intervening tick reads the same
//! port state and therefore returns identical values.

use crate::ports::DutPorts;

/// Detects request acceptance on both protocols.
///
/// Acceptance is the coincidence of the requester's valid and the
/// responder's grant/ready in the same cycle. Hold-stability of the request
/// between assertion and grant is the requester's obligation and is not
/// checked here.
#[derive(Debug, Default)]
pub struct RequestMonitor {
    obi_accepted: bool,
    reg_accepted: bool,
}

impl RequestMonitor {
    /// Creates a request monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the handshake signals for the current cycle.
    pub fn sample(&mut self, ports: &DutPorts) {
        self.obi_accepted = ports.obi_req && ports.obi_gnt;
        self.reg_accepted = ports.reg_valid && ports.reg_ready;
    }

    /// Whether an OBI request was accepted in the sampled cycle.
    pub fn accepted_obi(&self) -> bool {
        self.obi_accepted
    }

    /// Whether a register request was accepted in the sampled cycle.
    pub fn accepted_reg(&self) -> bool {
        self.reg_accepted
    }
}

/// Captures response data and the interrupt line.
#[derive(Debug, Default)]
pub struct ResponseMonitor {
    obi_rvalid: bool,
    obi_rdata: u32,
    reg_rdata: u32,
    irq: bool,
}

impl ResponseMonitor {
    /// Creates a response monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the response signals for the current cycle.
    pub fn sample(&mut self, ports: &DutPorts) {
        self.obi_rvalid = ports.obi_rvalid;
        self.obi_rdata = ports.obi_rdata;
        self.reg_rdata = ports.reg_rdata;
        self.irq = ports.irq;
    }

    /// Whether an OBI response is valid in the sampled cycle.
    pub fn obi_data_ready(&self) -> bool {
        self.obi_rvalid
    }

    /// OBI response data. Meaningful only when [`obi_data_ready`](Self::obi_data_ready) holds.
    pub fn obi_data(&self) -> u32 {
        self.obi_rdata
    }

    /// Register read data. Meaningful only in a register acceptance cycle.
    pub fn reg_data(&self) -> u32 {
        self.reg_rdata
    }

    /// Whether the interrupt line is asserted in the sampled cycle.
    pub fn irq(&self) -> bool {
        self.irq
    }
}
