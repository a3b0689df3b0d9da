//! Memory-mapped register map of the simulated SoC.
//!
//! Firmware is compiled against these addresses; the device models in
//! [`crate::soc`] are placed at the same bases by the default
//! configuration. All registers are 32 bits wide.

/// Base address of the simulation-control peripheral.
pub const SIM_CTRL_BASE: u32 = 0x0020_0000;
/// Diagnostic output channel (write-only). The low byte of each write is
/// one character of console output.
pub const SIM_CTRL_OUT: u32 = 0x0;
/// Simulation control register (write-only). Writing 1 signals completion.
pub const SIM_CTRL_CTRL: u32 = 0x8;

/// Base address of the timer peripheral.
pub const TIMER_BASE: u32 = 0x0030_0000;
/// Current time, low 32 bits (read-only).
pub const TIMER_MTIME: u32 = 0x0;
/// Current time, high 32 bits (read-only).
pub const TIMER_MTIMEH: u32 = 0x4;
/// Compare value, low 32 bits.
pub const TIMER_MTIMECMP: u32 = 0x8;
/// Compare value, high 32 bits.
pub const TIMER_MTIMECMPH: u32 = 0xC;

/// Base address of the main RAM region.
pub const RAM_BASE: u32 = 0x0010_0000;
/// Size of the main RAM region (1 MiB).
pub const RAM_SIZE: usize = 0x0010_0000;
