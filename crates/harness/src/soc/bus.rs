//! System bus: routes register transactions to devices by address.
//!
//! The bus is serialized by the clock — one transaction completes per
//! cycle boundary — so there is no arbitration or timing model here.
//! Unmapped reads return 0 and unmapped writes are dropped, both logged
//! at debug level.

use tracing::debug;

use crate::error::SimError;
use crate::soc::devices::{SimCtrl, Timer};
use crate::soc::traits::Device;

/// System bus connecting the hart to RAM and MMIO devices.
pub struct Bus {
    /// Registered devices, sorted by base address.
    devices: Vec<Box<dyn Device>>,
}

impl Bus {
    /// Creates an empty bus; attach devices with [`Bus::add_device`].
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Registers a device; the device list stays sorted by base address.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
    }

    fn find_device(&mut self, addr: u32) -> Option<(&mut Box<dyn Device>, u32)> {
        for dev in &mut self.devices {
            let (base, size) = dev.address_range();
            if addr >= base && addr - base < size {
                return Some((dev, addr - base));
            }
        }
        None
    }

    /// Reads a 32-bit register; unmapped addresses read as 0.
    pub fn read_u32(&mut self, addr: u32) -> u32 {
        match self.find_device(addr) {
            Some((dev, offset)) => dev.read_u32(offset),
            None => {
                debug!("read from unmapped address {addr:#010x}");
                0
            }
        }
    }

    /// Writes a 32-bit register; unmapped writes are dropped.
    pub fn write_u32(&mut self, addr: u32, val: u32) {
        match self.find_device(addr) {
            Some((dev, offset)) => dev.write_u32(offset, val),
            None => {
                debug!("write to unmapped address {addr:#010x}");
            }
        }
    }

    /// Advances every device by one cycle; returns the state of the
    /// timer interrupt line (the single interrupt source of this SoC).
    pub fn tick(&mut self) -> bool {
        let mut irq = false;
        for dev in &mut self.devices {
            irq |= dev.tick();
        }
        irq
    }

    /// Preloads a byte blob into the named memory region.
    ///
    /// # Errors
    ///
    /// `NoRegion` if no device carries that name, `ImageFit` if the blob
    /// is larger than the region.
    pub fn load_into(&mut self, region: &str, data: &[u8]) -> Result<(), SimError> {
        let dev = self
            .devices
            .iter_mut()
            .find(|d| d.name() == region)
            .ok_or_else(|| SimError::NoRegion {
                region: region.to_string(),
            })?;
        let (_, size) = dev.address_range();
        if data.len() > size as usize {
            return Err(SimError::ImageFit {
                region: region.to_string(),
                size: data.len(),
                capacity: size as usize,
            });
        }
        dev.write_bytes(0, data);
        Ok(())
    }

    /// Returns the timer device, if one is attached.
    pub fn timer(&self) -> Option<&Timer> {
        self.devices.iter().find_map(|d| d.as_timer())
    }

    /// Returns the simulation controller, if one is attached.
    pub fn sim_ctrl(&self) -> Option<&SimCtrl> {
        self.devices.iter().find_map(|d| d.as_sim_ctrl())
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
