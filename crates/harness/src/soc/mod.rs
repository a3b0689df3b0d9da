//! System-on-Chip model.
//!
//! This module organizes the components of the simulated system: the
//! register bus, the memory-mapped devices, the behavioral hart that
//! executes firmware, and the top-level [`system::SimpleSystem`] that
//! presents it all to the driver as a [`crate::sim::dut::Dut`].

/// System bus interconnect and routing.
pub mod bus;
/// Memory-mapped device implementations.
pub mod devices;
/// Behavioral hart and the firmware execution contract.
pub mod hart;
/// Top-level system assembly.
pub mod system;
/// Device trait definition for bus-attached components.
pub mod traits;

pub use bus::Bus;
pub use hart::{Firmware, Hart, Trap};
pub use system::SimpleSystem;
pub use traits::Device;
