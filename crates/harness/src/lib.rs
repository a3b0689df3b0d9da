//! Cycle-accurate co-simulation harness for a small RISC-V SoC.
//!
//! This crate implements both halves of the co-simulation loop:
//! 1. **Driver:** clock/reset sequencing, memory preload, VCD and text
//!    trace capture, and cooperative termination detection.
//! 2. **SoC:** register bus, RAM, timer, and simulation-control devices,
//!    plus a behavioral hart that executes firmware one step per cycle.
//! 3. **Runtime:** target-side services for firmware — a monotonic 64-bit
//!    timer with periodic interrupts, exception introspection, and the
//!    simulation-halt register.

/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Error types for the harness.
pub mod error;
/// Memory-mapped register map of the SoC.
pub mod regs;
/// Target-side runtime services (timer, exceptions, halt, console).
pub mod runtime;
/// Simulation driver (clock, reset, loader, trace sinks, main loop).
pub mod sim;
/// System-on-chip model (bus, devices, hart, top level).
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Harness error type.
pub use crate::error::SimError;
/// The half-cycle simulation loop; construct with `Driver::new`.
pub use crate::sim::driver::Driver;
/// Behavioral SoC implementing the [`sim::dut::Dut`] contract.
pub use crate::soc::system::SimpleSystem;
