//! Simulation controller.
//!
//! Two write-only registers used by firmware to talk to the harness:
//!
//! * `0x0`: OUT — diagnostic byte channel. The low byte of each write is
//!   one character; completed lines are logged, and the full transcript
//!   is retained for harness inspection.
//! * `0x8`: CTRL — writing 1 raises the shared halt flag and ends the
//!   simulation. Any other value is ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::regs;
use crate::soc::traits::Device;

/// Simulation-control device structure.
pub struct SimCtrl {
    /// Base physical address of the device.
    base_addr: u32,
    /// Shared flag signalling the driver to stop the clock loop.
    halt: Arc<AtomicBool>,
    /// Full diagnostic transcript.
    output: Vec<u8>,
    /// Bytes of the line currently being assembled.
    line: Vec<u8>,
}

impl SimCtrl {
    /// Creates a new simulation controller sharing the given halt flag.
    pub fn new(base_addr: u32, halt: Arc<AtomicBool>) -> Self {
        Self {
            base_addr,
            halt,
            output: Vec::new(),
            line: Vec::new(),
        }
    }

    /// Full diagnostic transcript written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn push_byte(&mut self, byte: u8) {
        self.output.push(byte);
        if byte == b'\n' {
            let line = String::from_utf8_lossy(&self.line).into_owned();
            info!(target: "guest", "{line}");
            self.line.clear();
        } else {
            self.line.push(byte);
        }
    }
}

impl Device for SimCtrl {
    fn name(&self) -> &str {
        "sim_ctrl"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, 0x10)
    }

    /// Both registers are write-only; reads return 0.
    fn read_u8(&mut self, _offset: u32) -> u8 {
        0
    }
    /// Both registers are write-only; reads return 0.
    fn read_u32(&mut self, _offset: u32) -> u32 {
        0
    }

    fn write_u8(&mut self, offset: u32, val: u8) {
        self.write_u32(offset, u32::from(val));
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        match offset {
            regs::SIM_CTRL_OUT => self.push_byte(val as u8),
            regs::SIM_CTRL_CTRL => {
                if val == 1 {
                    info!("simulation halt requested");
                    self.halt.store(true, Ordering::Relaxed);
                }
            }
            _ => {}
        }
    }

    fn as_sim_ctrl(&self) -> Option<&SimCtrl> {
        Some(self)
    }
}
