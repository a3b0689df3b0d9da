//! Trace sinks: VCD waveform capture and text execution trace.
//!
//! Each sink is independently enabled and moves through the states
//! disabled → open → closed. A closed sink never accepts another write;
//! closing is idempotent and flushes buffered data exactly once. The
//! driver closes both sinks on every exit path so no buffered trace data
//! is lost on early termination.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::SimError;
use crate::sim::dut::Signal;

/// VCD (Value Change Dump) writer over any byte sink.
///
/// The header declares one scope with one `$var` per traced signal; each
/// [`VcdWriter::dump`] emits a `#time` record followed by the signals
/// whose values changed since the previous dump (all of them, inside
/// `$dumpvars`, on the first).
pub struct VcdWriter<W: Write> {
    out: W,
    ids: Vec<char>,
    last: Vec<u64>,
    dumped: bool,
}

impl<W: Write> VcdWriter<W> {
    /// Writes the VCD header for the given signal set.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn new(mut out: W, signals: &[Signal]) -> io::Result<Self> {
        debug_assert!(signals.len() < 94, "single-character VCD id space");
        writeln!(out, "$timescale 1ns $end")?;
        writeln!(out, "$scope module simple_system $end")?;
        let mut ids = Vec::with_capacity(signals.len());
        for (i, sig) in signals.iter().enumerate() {
            let id = char::from(b'!' + i as u8);
            writeln!(out, "$var wire {} {} {} $end", sig.width, id, sig.name)?;
            ids.push(id);
        }
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;
        Ok(Self {
            out,
            ids,
            last: vec![0; signals.len()],
            dumped: false,
        })
    }

    fn write_value(out: &mut W, id: char, sig: &Signal) -> io::Result<()> {
        if sig.width == 1 {
            writeln!(out, "{}{}", sig.value & 1, id)
        } else {
            writeln!(out, "b{:b} {}", sig.value, id)
        }
    }

    /// Emits one sample at the given simulated time.
    ///
    /// # Errors
    ///
    /// Propagates write failures on the underlying sink.
    pub fn dump(&mut self, time: u64, signals: &[Signal]) -> io::Result<()> {
        writeln!(self.out, "#{time}")?;
        if self.dumped {
            for (i, sig) in signals.iter().enumerate() {
                if self.last[i] != sig.value {
                    Self::write_value(&mut self.out, self.ids[i], sig)?;
                    self.last[i] = sig.value;
                }
            }
        } else {
            writeln!(self.out, "$dumpvars")?;
            for (i, sig) in signals.iter().enumerate() {
                Self::write_value(&mut self.out, self.ids[i], sig)?;
                self.last[i] = sig.value;
            }
            writeln!(self.out, "$end")?;
            self.dumped = true;
        }
        Ok(())
    }

    /// Flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// Propagates flush failures on the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Sink lifecycle shared by both trace outputs.
enum SinkState<T> {
    Disabled,
    Open(T),
    Closed,
}

/// Waveform sink recording per-half-cycle signal values to a VCD file.
pub struct WaveformSink {
    state: SinkState<VcdWriter<BufWriter<File>>>,
}

impl WaveformSink {
    /// A sink that records nothing.
    pub fn disabled() -> Self {
        Self {
            state: SinkState::Disabled,
        }
    }

    /// Opens the sink and writes the VCD header for `signals`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or the header write fails.
    pub fn open(path: &Path, signals: &[Signal]) -> Result<Self, SimError> {
        let writer = VcdWriter::new(BufWriter::new(File::create(path)?), signals)?;
        Ok(Self {
            state: SinkState::Open(writer),
        })
    }

    /// Whether the sink currently accepts samples.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SinkState::Open(_))
    }

    /// Records one sample; a disabled or closed sink ignores it.
    ///
    /// # Errors
    ///
    /// Propagates write failures on an open sink.
    pub fn sample(&mut self, time: u64, signals: &[Signal]) -> Result<(), SimError> {
        if let SinkState::Open(writer) = &mut self.state {
            writer.dump(time, signals)?;
        }
        Ok(())
    }

    /// Flushes buffered samples; a disabled or closed sink ignores it.
    ///
    /// # Errors
    ///
    /// Propagates flush failures on an open sink.
    pub fn flush(&mut self) -> Result<(), SimError> {
        if let SinkState::Open(writer) = &mut self.state {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and closes the sink; afterwards no write is accepted.
    /// Closing an already closed or disabled sink is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the final flush failure.
    pub fn close(&mut self) -> Result<(), SimError> {
        if let SinkState::Open(mut writer) = std::mem::replace(&mut self.state, SinkState::Closed) {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Execution-trace sink recording one text line per retired step.
pub struct InstructionTrace {
    state: SinkState<BufWriter<File>>,
}

impl InstructionTrace {
    /// A sink that records nothing.
    pub fn disabled() -> Self {
        Self {
            state: SinkState::Disabled,
        }
    }

    /// Opens the text log at the given path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created.
    pub fn open(path: &Path) -> Result<Self, SimError> {
        Ok(Self {
            state: SinkState::Open(BufWriter::new(File::create(path)?)),
        })
    }

    /// Whether the sink currently accepts records.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SinkState::Open(_))
    }

    /// Appends one line; a disabled or closed sink ignores it.
    ///
    /// # Errors
    ///
    /// Propagates write failures on an open sink.
    pub fn record(&mut self, line: &str) -> Result<(), SimError> {
        if let SinkState::Open(writer) = &mut self.state {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    /// Flushes and closes the sink; afterwards no write is accepted.
    /// Closing an already closed or disabled sink is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates the final flush failure.
    pub fn close(&mut self) -> Result<(), SimError> {
        if let SinkState::Open(mut writer) = std::mem::replace(&mut self.state, SinkState::Closed) {
            writer.flush()?;
        }
        Ok(())
    }
}
