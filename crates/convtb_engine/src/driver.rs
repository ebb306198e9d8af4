//! Serializes transactions onto the DUT's input ports.

use crate::ports::DutPorts;
use crate::txn::{ObiRequest, RegRequest};

/// Converts at most one pending transaction per protocol per cycle into
/// signal-level assignments on the DUT's input ports.
///
/// The driver keeps no state and never retries: an empty slot deasserts the
/// protocol's valid signal, and a request that goes un-granted this cycle
/// must be re-issued by its producer.
#[derive(Debug, Default)]
pub struct Driver;

impl Driver {
    /// Creates a driver.
    pub fn new() -> Self {
        Self
    }

    /// Applies the given requests to the DUT input ports for this cycle.
    pub fn drive(
        &mut self,
        ports: &mut DutPorts,
        obi: Option<ObiRequest>,
        reg: Option<RegRequest>,
    ) {
        match obi {
            Some(req) => {
                ports.obi_req = true;
                ports.obi_we = req.write;
                ports.obi_be = req.be;
                ports.obi_addr = req.addr;
                ports.obi_wdata = req.wdata;
            }
            None => ports.obi_req = false,
        }
        match reg {
            Some(req) => {
                ports.reg_valid = true;
                ports.reg_write = req.write;
                ports.reg_wstrb = req.wstrb;
                ports.reg_addr = req.addr;
                ports.reg_wdata = req.wdata;
            }
            None => ports.reg_valid = false,
        }
    }
}
