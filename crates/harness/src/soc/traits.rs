//! Device trait for memory-mapped I/O.
//!
//! Implemented by every bus-attached component. The register bus of this
//! SoC is 32 bits wide; byte access exists for memory preload and the
//! diagnostic channel, everything else is word-sized.

use crate::soc::devices::{SimCtrl, Timer};

/// Trait for memory-mapped devices attached to the system bus.
pub trait Device {
    /// Short name for this device (e.g. `"ram0"`, `"timer0"`). Also the
    /// key used to address a region for memory preload.
    fn name(&self) -> &str;

    /// Returns (base address, size in bytes) of this device's region.
    fn address_range(&self) -> (u32, u32);

    /// Reads one byte at the given device-relative offset.
    fn read_u8(&mut self, offset: u32) -> u8;
    /// Reads a 32-bit word (little-endian) at the given offset.
    fn read_u32(&mut self, offset: u32) -> u32;
    /// Writes one byte at the given offset.
    fn write_u8(&mut self, offset: u32, val: u8);
    /// Writes a 32-bit word (little-endian) at the given offset.
    fn write_u32(&mut self, offset: u32, val: u32);

    /// Writes a contiguous byte slice at the given offset (default:
    /// byte-by-byte).
    fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(offset + i as u32, *byte);
        }
    }

    /// Advances device state by one cycle; returns `true` while the
    /// device asserts its interrupt line.
    fn tick(&mut self) -> bool {
        false
    }

    /// Returns this device as the timer, if it is one.
    fn as_timer(&self) -> Option<&Timer> {
        None
    }
    /// Returns this device as the simulation controller, if it is one.
    fn as_sim_ctrl(&self) -> Option<&SimCtrl> {
        None
    }
}
