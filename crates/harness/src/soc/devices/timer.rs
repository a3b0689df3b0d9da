//! Machine timer.
//!
//! Holds a 64-bit monotonic counter (`mtime`) and a 64-bit compare value
//! (`mtimecmp`), each exposed to firmware as two independent 32-bit
//! registers. The interrupt line is level-asserted while
//! `mtime >= mtimecmp`.
//!
//! # Memory Map
//!
//! * `0x0`: MTIME low (read-only)
//! * `0x4`: MTIME high (read-only)
//! * `0x8`: MTIMECMP low
//! * `0xC`: MTIMECMP high

use crate::regs;
use crate::soc::traits::Device;

/// Timer device structure.
pub struct Timer {
    /// Base physical address of the device.
    base_addr: u32,
    /// Current machine time counter.
    mtime: u64,
    /// Machine time compare register.
    mtimecmp: u64,
    /// Divider to scale clock cycles to timer ticks.
    divider: u64,
    /// Internal counter for the divider.
    counter: u64,
}

impl Timer {
    /// Creates a new timer.
    ///
    /// `divider` is the ratio of clock cycles to timer ticks; 0 is
    /// treated as 1. The compare register resets to `u64::MAX` so the
    /// interrupt line stays deasserted until firmware arms it.
    pub fn new(base_addr: u32, divider: u64) -> Self {
        Self {
            base_addr,
            mtime: 0,
            mtimecmp: u64::MAX,
            divider: if divider == 0 { 1 } else { divider },
            counter: 0,
        }
    }

    /// Current value of the time counter.
    pub fn now(&self) -> u64 {
        self.mtime
    }

    /// Current value of the compare register.
    pub fn compare(&self) -> u64 {
        self.mtimecmp
    }

    /// Whether the interrupt condition currently holds.
    pub fn irq_pending(&self) -> bool {
        self.mtime >= self.mtimecmp
    }
}

impl Device for Timer {
    fn name(&self) -> &str {
        "timer0"
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, 0x10)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        let val = self.read_u32(offset & !3);
        ((val >> ((offset & 3) * 8)) & 0xFF) as u8
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        match offset {
            regs::TIMER_MTIME => self.mtime as u32,
            regs::TIMER_MTIMEH => (self.mtime >> 32) as u32,
            regs::TIMER_MTIMECMP => self.mtimecmp as u32,
            regs::TIMER_MTIMECMPH => (self.mtimecmp >> 32) as u32,
            _ => 0,
        }
    }

    /// Byte writes are not meaningful on this device.
    fn write_u8(&mut self, _offset: u32, _val: u8) {}

    fn write_u32(&mut self, offset: u32, val: u32) {
        match offset {
            // MTIME is read-only from the bus side.
            regs::TIMER_MTIMECMP => {
                self.mtimecmp = (self.mtimecmp & 0xFFFF_FFFF_0000_0000) | u64::from(val);
            }
            regs::TIMER_MTIMECMPH => {
                self.mtimecmp =
                    (self.mtimecmp & 0x0000_0000_FFFF_FFFF) | (u64::from(val) << 32);
            }
            _ => {}
        }
    }

    fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.divider {
            self.mtime = self.mtime.wrapping_add(1);
            self.counter = 0;
        }
        self.irq_pending()
    }

    fn as_timer(&self) -> Option<&Timer> {
        Some(self)
    }
}
