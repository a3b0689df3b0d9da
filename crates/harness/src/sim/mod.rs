//! Simulation driver.
//!
//! Owns everything on the host side of the co-simulation: the clock and
//! reset schedule ([`clock`]), the DUT contract ([`dut`]), the memory
//! image loader ([`loader`]), the trace sinks ([`trace`]), and the
//! half-cycle main loop ([`driver`]).

pub mod clock;
pub mod driver;
pub mod dut;
pub mod loader;
pub mod trace;

pub use driver::{Driver, RunSummary, TraceOptions};
pub use dut::{Dut, Signal};
