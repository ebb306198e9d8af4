//! The DUT's wire-level port frame.
//!
//! [`DutPorts`] is the shared signal state between the harness and the
//! device under test: the driver is its only input-side writer, monitors
//! read it, and the DUT model writes its output side once per half-cycle.
//! Only the handshake semantics matter to the engine; the exact set of
//! names here mirrors the CONV1D wrapper the harness was built against.

/// Flat wire-level port state of the device under test.
///
/// Input ports (driven by the harness): clock, reset, and the request side
/// of both protocols. Output ports (driven by the model): grant/ready,
/// response data/valid, and the interrupt line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DutPorts {
    /// Clock input.
    pub clk: bool,
    /// Active-low reset input.
    pub rst_n: bool,

    /// OBI request valid.
    pub obi_req: bool,
    /// OBI write enable.
    pub obi_we: bool,
    /// OBI byte-enable mask (4 bits).
    pub obi_be: u8,
    /// OBI request address.
    pub obi_addr: u32,
    /// OBI write data.
    pub obi_wdata: u32,
    /// OBI grant (request accepted this cycle).
    pub obi_gnt: bool,
    /// OBI response valid.
    pub obi_rvalid: bool,
    /// OBI response data.
    pub obi_rdata: u32,

    /// Register request valid.
    pub reg_valid: bool,
    /// Register write enable.
    pub reg_write: bool,
    /// Register write strobe mask (4 bits).
    pub reg_wstrb: u8,
    /// Register address.
    pub reg_addr: u32,
    /// Register write data.
    pub reg_wdata: u32,
    /// Register ready (request accepted this cycle).
    pub reg_ready: bool,
    /// Register read data, valid in the acceptance cycle.
    pub reg_rdata: u32,

    /// Interrupt output.
    pub irq: bool,
}

impl DutPorts {
    /// Signal table used for waveform registration: `(name, width)` pairs
    /// in the same order [`snapshot`](Self::snapshot) emits values.
    pub const SIGNALS: &'static [(&'static str, u32)] = &[
        ("clk", 1),
        ("rst_n", 1),
        ("obi_req", 1),
        ("obi_we", 1),
        ("obi_be", 4),
        ("obi_addr", 32),
        ("obi_wdata", 32),
        ("obi_gnt", 1),
        ("obi_rvalid", 1),
        ("obi_rdata", 32),
        ("reg_valid", 1),
        ("reg_write", 1),
        ("reg_wstrb", 4),
        ("reg_addr", 32),
        ("reg_wdata", 32),
        ("reg_ready", 1),
        ("reg_rdata", 32),
        ("irq", 1),
    ];

    /// Returns all port values in [`SIGNALS`](Self::SIGNALS) order.
    pub fn snapshot(&self) -> Vec<u64> {
        vec![
            self.clk as u64,
            self.rst_n as u64,
            self.obi_req as u64,
            self.obi_we as u64,
            self.obi_be as u64,
            self.obi_addr as u64,
            self.obi_wdata as u64,
            self.obi_gnt as u64,
            self.obi_rvalid as u64,
            self.obi_rdata as u64,
            self.reg_valid as u64,
            self.reg_write as u64,
            self.reg_wstrb as u64,
            self.reg_addr as u64,
            self.reg_wdata as u64,
            self.reg_ready as u64,
            self.reg_rdata as u64,
            self.irq as u64,
        ]
    }
}

/// The device under test, seen as an opaque evaluator over [`DutPorts`].
///
/// `eval` is called once per half-cycle after clock, reset, and any driven
/// request values have been applied — the same contract as an RTL model's
/// `eval()` in an event loop. Implementations detect their own clock edge
/// from `ports.clk` and must only write output-side ports.
pub trait DutModel {
    /// Settles the model against the current port state.
    fn eval(&mut self, ports: &mut DutPorts);
}
