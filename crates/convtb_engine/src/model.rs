//! Behavioral model of the CONV1D accelerator.
//!
//! [`Conv1dModel`] implements [`DutModel`] at the same wire-level contract
//! an RTL simulation would present: grant and register-ready are
//! combinational, OBI read data returns one cycle after acceptance, the
//! interrupt is a level until the status register is read. Grant carries
//! randomized backpressure so the harness's retry paths stay exercised;
//! denial never lasts two consecutive cycles.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::{DutModel, DutPorts};

/// Control register: writing bit 0 starts a computation.
pub const REG_CTRL: u32 = 0x00;
/// Status register: reading it clears the done flag and the interrupt.
pub const REG_STATUS: u32 = 0x04;
/// Input length register, in samples.
pub const REG_LENGTH: u32 = 0x08;
/// First of three filter tap registers at consecutive word addresses.
pub const REG_FILTER0: u32 = 0x0C;
/// Byte address of the first output word in the OBI address space.
pub const OUTPUT_BASE: u32 = 0x1000;

/// Status bit: the last computation has finished.
pub const STATUS_DONE: u32 = 0x1;
/// Status bit: a computation is in flight.
pub const STATUS_BUSY: u32 = 0x2;

/// Fixed number of filter taps.
pub const NUM_TAPS: usize = 3;

/// Pipeline cycles added on top of one cycle per input sample.
const COMPUTE_OVERHEAD: u64 = 4;

/// Software CONV1D accelerator with OBI and register interfaces.
pub struct Conv1dModel {
    prev_clk: bool,

    mem: HashMap<u32, u32>,
    outputs: Vec<u32>,
    length: u32,
    taps: [u32; NUM_TAPS],

    busy: bool,
    done: bool,
    irq: bool,
    countdown: u64,

    pending_rsp: Option<u32>,
    gnt_allow: bool,
    deny_rate: f64,
    rng: StdRng,
}

impl Conv1dModel {
    /// Creates a model with the default grant backpressure.
    pub fn new(seed: u64) -> Self {
        Self::with_deny_rate(seed, 0.25)
    }

    /// Creates a model denying grant with the given probability per cycle.
    pub fn with_deny_rate(seed: u64, deny_rate: f64) -> Self {
        Self {
            prev_clk: false,
            mem: HashMap::new(),
            outputs: Vec::new(),
            length: 0,
            taps: [0; NUM_TAPS],
            busy: false,
            done: false,
            irq: false,
            countdown: 0,
            pending_rsp: None,
            gnt_allow: true,
            deny_rate: deny_rate.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn reset_state(&mut self) {
        self.mem.clear();
        self.outputs.clear();
        self.length = 0;
        self.taps = [0; NUM_TAPS];
        self.busy = false;
        self.done = false;
        self.irq = false;
        self.countdown = 0;
        self.pending_rsp = None;
        self.gnt_allow = true;
    }

    fn merge_bytes(old: u32, new: u32, mask: u8) -> u32 {
        let mut out = old;
        for byte in 0..4 {
            if mask & (1 << byte) != 0 {
                let shift = byte * 8;
                out = (out & !(0xff << shift)) | (new & (0xff << shift));
            }
        }
        out
    }

    fn read_mem(&self, addr: u32) -> u32 {
        if addr >= OUTPUT_BASE {
            let idx = ((addr - OUTPUT_BASE) / 4) as usize;
            self.outputs.get(idx).copied().unwrap_or(0)
        } else {
            self.mem.get(&(addr / 4)).copied().unwrap_or(0)
        }
    }

    fn write_mem(&mut self, addr: u32, wdata: u32, be: u8) {
        // The output region is read-only.
        if addr >= OUTPUT_BASE {
            return;
        }
        let word = addr / 4;
        let old = self.mem.get(&word).copied().unwrap_or(0);
        self.mem.insert(word, Self::merge_bytes(old, wdata, be));
    }

    fn read_reg(&self, addr: u32) -> u32 {
        match addr & !0x3 {
            REG_CTRL => 0,
            REG_STATUS => {
                (if self.done { STATUS_DONE } else { 0 })
                    | (if self.busy { STATUS_BUSY } else { 0 })
            }
            REG_LENGTH => self.length,
            a if (REG_FILTER0..REG_FILTER0 + 4 * NUM_TAPS as u32).contains(&a) => {
                self.taps[((a - REG_FILTER0) / 4) as usize]
            }
            _ => 0,
        }
    }

    fn write_reg(&mut self, addr: u32, wdata: u32, wstrb: u8) {
        match addr & !0x3 {
            REG_CTRL => {
                if Self::merge_bytes(0, wdata, wstrb) & 0x1 != 0 && !self.busy {
                    self.busy = true;
                    self.done = false;
                    self.irq = false;
                    self.countdown = self.length as u64 + COMPUTE_OVERHEAD;
                }
            }
            REG_LENGTH => {
                self.length = Self::merge_bytes(self.length, wdata, wstrb);
            }
            a if (REG_FILTER0..REG_FILTER0 + 4 * NUM_TAPS as u32).contains(&a) => {
                let idx = ((a - REG_FILTER0) / 4) as usize;
                self.taps[idx] = Self::merge_bytes(self.taps[idx], wdata, wstrb);
            }
            _ => {}
        }
    }

    fn compute(&mut self) {
        let n = self.length as usize;
        self.outputs.clear();
        if n < NUM_TAPS {
            return;
        }
        for i in 0..=n - NUM_TAPS {
            let mut acc = 0u32;
            for (j, &tap) in self.taps.iter().enumerate() {
                let sample = self.mem.get(&((i + j) as u32)).copied().unwrap_or(0);
                acc = acc.wrapping_add(sample.wrapping_mul(tap));
            }
            self.outputs.push(acc);
        }
    }
}

impl DutModel for Conv1dModel {
    fn eval(&mut self, ports: &mut DutPorts) {
        if !ports.rst_n {
            self.reset_state();
            ports.obi_gnt = false;
            ports.obi_rvalid = false;
            ports.obi_rdata = 0;
            ports.reg_ready = false;
            ports.reg_rdata = 0;
            ports.irq = false;
            self.prev_clk = ports.clk;
            return;
        }

        let posedge = ports.clk && !self.prev_clk;
        self.prev_clk = ports.clk;

        if posedge {
            // Publish the read accepted on the previous edge.
            match self.pending_rsp.take() {
                Some(data) => {
                    ports.obi_rvalid = true;
                    ports.obi_rdata = data;
                }
                None => ports.obi_rvalid = false,
            }

            // Latch the request that was on the wires, under the grant
            // decision that was in force for that cycle.
            if ports.obi_req && self.gnt_allow {
                if ports.obi_we {
                    self.write_mem(ports.obi_addr, ports.obi_wdata, ports.obi_be);
                } else {
                    self.pending_rsp = Some(self.read_mem(ports.obi_addr));
                }
            }
            if ports.reg_valid {
                if ports.reg_write {
                    self.write_reg(ports.reg_addr, ports.reg_wdata, ports.reg_wstrb);
                } else if ports.reg_addr & !0x3 == REG_STATUS {
                    self.done = false;
                    self.irq = false;
                }
            }

            if self.busy {
                self.countdown -= 1;
                if self.countdown == 0 {
                    self.compute();
                    self.busy = false;
                    self.done = true;
                    self.irq = true;
                }
            }

            // Grant decision for the coming cycle, frozen until the next
            // edge. Never deny two cycles in a row, so a retrying master
            // is delayed by at most one cycle per request.
            self.gnt_allow = !self.gnt_allow || !self.rng.gen_bool(self.deny_rate);
        }

        ports.obi_gnt = ports.obi_req && self.gnt_allow;
        ports.reg_ready = true;
        if ports.reg_valid && !ports.reg_write {
            ports.reg_rdata = self.read_reg(ports.reg_addr);
        }
        ports.irq = self.irq;
    }
}
