//! Bus transaction descriptors.
//!
//! Requests are immutable values. Ownership moves from the stimulus program
//! to the [`Driver`](crate::driver::Driver), which consumes a request after
//! a single drive attempt: a request that is not accepted that cycle is not
//! retried by the driver — retry policy belongs to the producer.

/// A request on the OBI memory interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObiRequest {
    /// Byte address.
    pub addr: u32,
    /// Write data (ignored for reads).
    pub wdata: u32,
    /// Byte-enable mask, low 4 bits significant.
    pub be: u8,
    /// `true` for a write, `false` for a read.
    pub write: bool,
}

impl ObiRequest {
    /// Builds a full-word read request.
    pub fn read(addr: u32) -> Self {
        Self {
            addr,
            wdata: 0,
            be: 0xf,
            write: false,
        }
    }

    /// Builds a write request with the given byte-enable mask.
    pub fn write(addr: u32, wdata: u32, be: u8) -> Self {
        Self {
            addr,
            wdata,
            be: be & 0xf,
            write: true,
        }
    }
}

/// A request on the register configuration interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegRequest {
    /// Register byte address.
    pub addr: u32,
    /// Write data (ignored for reads).
    pub wdata: u32,
    /// Write strobe mask, low 4 bits significant.
    pub wstrb: u8,
    /// `true` for a write, `false` for a read.
    pub write: bool,
}

impl RegRequest {
    /// Builds a register read request.
    pub fn read(addr: u32) -> Self {
        Self {
            addr,
            wdata: 0,
            wstrb: 0xf,
            write: false,
        }
    }

    /// Builds a register write request with the given strobe mask.
    pub fn write(addr: u32, wdata: u32, wstrb: u8) -> Self {
        Self {
            addr,
            wdata,
            wstrb: wstrb & 0xf,
            write: true,
        }
    }
}
