//! The half-cycle simulation loop.
//!
//! The driver owns simulated time. Per cycle, in order: apply the reset
//! line from the schedule, drive the clock high and evaluate, sample the
//! waveform at the rising-edge timestamp, drive the clock low and
//! evaluate, sample at the falling-edge timestamp and flush, drain the
//! execution trace, advance the cycle counter. Both clock phases are
//! sampled so combinational activity is visible in the waveform.
//!
//! Termination is cooperative: the only stopping condition is the DUT's
//! finished signal (or the optional external cycle bound of
//! [`Driver::run_for`]). On every exit path both trace sinks are flushed
//! and closed before the driver returns.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{Config, OutputConfig};
use crate::error::SimError;
use crate::sim::clock::{ResetSchedule, SimClock};
use crate::sim::dut::Dut;
use crate::sim::loader;
use crate::sim::trace::{InstructionTrace, WaveformSink};

/// Independent run-time switches for the two trace sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceOptions {
    /// Record a VCD waveform.
    pub waveform: bool,
    /// Record the text execution trace.
    pub instruction: bool,
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of full clock cycles executed.
    pub cycles: u64,
    /// True if the DUT signalled completion; false if the external cycle
    /// bound ended the run first.
    pub finished: bool,
}

/// Simulation driver: advances a [`Dut`] in lock-step with simulated time.
pub struct Driver<D: Dut> {
    dut: D,
    output: OutputConfig,
    load_region: String,
    clock: SimClock,
    reset: ResetSchedule,
    waveform: WaveformSink,
    instruction: InstructionTrace,
}

impl<D: Dut> Driver<D> {
    /// Creates a driver around a design instance.
    pub fn new(dut: D, config: &Config) -> Self {
        Self {
            dut,
            output: config.output.clone(),
            load_region: config.system.load_region.clone(),
            clock: SimClock::new(),
            reset: ResetSchedule::new(),
            waveform: WaveformSink::disabled(),
            instruction: InstructionTrace::disabled(),
        }
    }

    /// The design under test.
    pub fn dut(&self) -> &D {
        &self.dut
    }

    /// The design under test, mutably.
    pub fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// Consumes the driver, releasing the design instance.
    pub fn into_dut(self) -> D {
        self.dut
    }

    /// Runs until the DUT signals completion.
    ///
    /// # Errors
    ///
    /// Fatal startup errors (image load, region preload, sink open) abort
    /// before the clock loop; sink I/O failures abort the loop.
    pub fn run(&mut self, image: &Path, traces: TraceOptions) -> Result<RunSummary, SimError> {
        self.run_for(image, traces, None)
    }

    /// Runs until the DUT signals completion or `limit` cycles elapse.
    ///
    /// The bound stands in for external termination of an otherwise
    /// unbounded run; normal operation passes `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Driver::run`].
    pub fn run_for(
        &mut self,
        image: &Path,
        traces: TraceOptions,
        limit: Option<u64>,
    ) -> Result<RunSummary, SimError> {
        let result = self.start_and_loop(image, traces, limit);
        // Flush and close every open sink before anything else, on
        // success and failure alike.
        let wave_closed = self.waveform.close();
        let instr_closed = self.instruction.close();
        let summary = result?;
        wave_closed?;
        instr_closed?;
        Ok(summary)
    }

    fn start_and_loop(
        &mut self,
        image: &Path,
        traces: TraceOptions,
        limit: Option<u64>,
    ) -> Result<RunSummary, SimError> {
        fs::create_dir_all(&self.output.log_dir)?;

        let image_bytes = loader::load_image(image)?;
        info!(
            path = %image.display(),
            bytes = image_bytes.len(),
            region = %self.load_region,
            "loading memory image"
        );
        self.dut.load_memory(&self.load_region, &image_bytes)?;

        if traces.waveform {
            let defs = self.dut.signals();
            self.waveform = WaveformSink::open(&self.output.waveform_path(), &defs)?;
        }
        if traces.instruction {
            self.instruction = InstructionTrace::open(&self.output.trace_path())?;
        }

        loop {
            if self.dut.finished() {
                info!(cycles = self.clock.cycle(), "simulation finished");
                return Ok(RunSummary {
                    cycles: self.clock.cycle(),
                    finished: true,
                });
            }
            if limit.is_some_and(|max| self.clock.cycle() >= max) {
                return Ok(RunSummary {
                    cycles: self.clock.cycle(),
                    finished: false,
                });
            }

            let (line, released) = self.reset.advance(self.clock.cycle());
            self.dut.set_reset_n(line);
            if released {
                info!(cycle = self.clock.cycle(), "cpu reset released");
            }

            self.dut.set_clock(true);
            self.dut.eval();
            self.waveform
                .sample(self.clock.rising_edge_time(), &self.dut.signals())?;

            self.dut.set_clock(false);
            self.dut.eval();
            self.waveform
                .sample(self.clock.falling_edge_time(), &self.dut.signals())?;
            self.waveform.flush()?;

            for trace_line in self.dut.drain_trace() {
                self.instruction.record(&trace_line)?;
            }

            self.clock.advance();
        }
    }
}
