//! Byte-addressable RAM region.
//!
//! Plain backing store for the program image and firmware data. Word
//! access is little-endian; out-of-range offsets read as zero and drop
//! writes (the bus has already range-checked the base, so these only
//! occur for partially out-of-range word accesses at the region edge).

use crate::soc::traits::Device;

/// RAM device backed by a byte vector.
pub struct Ram {
    name: String,
    base_addr: u32,
    data: Vec<u8>,
}

impl Ram {
    /// Creates a zero-filled RAM region.
    pub fn new(name: &str, base_addr: u32, size: usize) -> Self {
        Self {
            name: name.to_string(),
            base_addr,
            data: vec![0; size],
        }
    }
}

impl Device for Ram {
    fn name(&self) -> &str {
        &self.name
    }

    fn address_range(&self) -> (u32, u32) {
        (self.base_addr, self.data.len() as u32)
    }

    fn read_u8(&mut self, offset: u32) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }

    fn read_u32(&mut self, offset: u32) -> u32 {
        let offset = offset as usize;
        match self.data.get(offset..offset + 4) {
            Some(bytes) => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            None => 0,
        }
    }

    fn write_u8(&mut self, offset: u32, val: u8) {
        if let Some(byte) = self.data.get_mut(offset as usize) {
            *byte = val;
        }
    }

    fn write_u32(&mut self, offset: u32, val: u32) {
        let offset = offset as usize;
        if let Some(bytes) = self.data.get_mut(offset..offset + 4) {
            bytes.copy_from_slice(&val.to_le_bytes());
        }
    }

    fn write_bytes(&mut self, offset: u32, data: &[u8]) {
        let offset = offset as usize;
        if let Some(dst) = self.data.get_mut(offset..offset + data.len()) {
            dst.copy_from_slice(data);
        }
    }
}
