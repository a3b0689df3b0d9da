//! Configuration for the co-simulation harness.
//!
//! Supplies the SoC memory map, the timer divider, and the output paths
//! for trace artifacts. Deserialize from JSON or use `Config::default()`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::regs;

/// Default configuration constants for the harness.
mod defaults {
    /// Default log directory, created at startup if absent.
    pub const LOG_DIR: &str = "log";

    /// Waveform file name inside the log directory.
    pub const WAVEFORM_FILE: &str = "tb.vcd";

    /// Execution-trace file name inside the log directory.
    pub const TRACE_FILE: &str = "tb.trace";

    /// Name of the memory region preloaded with the program image.
    pub const LOAD_REGION: &str = "ram0";

    /// Timer divider (mtime increments every N cycles).
    pub const TIMER_DIVIDER: u64 = 1;
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SoC memory map and timer settings.
    pub system: SystemConfig,
    /// Trace artifact locations.
    pub output: OutputConfig,
}

/// SoC memory map and timer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Base address of main RAM.
    pub ram_base: u32,
    /// Size of main RAM in bytes.
    pub ram_size: usize,
    /// Name of the memory region the program image is loaded into.
    pub load_region: String,
    /// Base address of the timer peripheral.
    pub timer_base: u32,
    /// Ratio of clock cycles to timer ticks.
    pub timer_divider: u64,
    /// Base address of the simulation-control peripheral.
    pub sim_ctrl_base: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_base: regs::RAM_BASE,
            ram_size: regs::RAM_SIZE,
            load_region: defaults::LOAD_REGION.to_string(),
            timer_base: regs::TIMER_BASE,
            timer_divider: defaults::TIMER_DIVIDER,
            sim_ctrl_base: regs::SIM_CTRL_BASE,
        }
    }
}

/// Trace artifact locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for all persisted artifacts; created at startup.
    pub log_dir: PathBuf,
    /// Waveform file name inside `log_dir`.
    pub waveform_file: String,
    /// Execution-trace file name inside `log_dir`.
    pub trace_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(defaults::LOG_DIR),
            waveform_file: defaults::WAVEFORM_FILE.to_string(),
            trace_file: defaults::TRACE_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of the waveform file.
    pub fn waveform_path(&self) -> PathBuf {
        self.log_dir.join(&self.waveform_file)
    }

    /// Full path of the execution-trace file.
    pub fn trace_path(&self) -> PathBuf {
        self.log_dir.join(&self.trace_file)
    }
}
