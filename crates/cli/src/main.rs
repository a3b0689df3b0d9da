//! Co-simulation CLI.
//!
//! Runs the behavioral `SimpleSystem` under the simulation driver. It performs:
//! 1. **Image load:** The positional argument is a raw binary or `.vmem` file
//!    preloaded into SoC RAM before the first clock edge.
//! 2. **Tracing:** `--vcd` and `--trace` independently enable the waveform
//!    and execution-trace sinks under the log directory.
//! 3. **Firmware:** Ships a built-in demonstration firmware that greets,
//!    arms a periodic timer interrupt, and prints the timer value halves
//!    on every fire.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cosim_core::runtime::timer::{self, TimerService};
use cosim_core::runtime::{console, Machine};
use cosim_core::sim::driver::TraceOptions;
use cosim_core::soc::hart::{Firmware, Trap};
use cosim_core::{Config, Driver, SimpleSystem};

#[derive(Parser, Debug)]
#[command(
    name = "cosim",
    version,
    about = "Cycle-accurate SoC co-simulation harness",
    long_about = "Drives the behavioral simple_system model one half-cycle at a time:\n\
                  reset sequencing, memory preload, optional VCD/trace capture, and\n\
                  cooperative termination via the simulation-control register.\n\n\
                  Examples:\n  cosim image.vmem --vcd\n  cosim image.bin --trace --max-cycles 500000"
)]
struct Cli {
    /// Memory image preloaded into SoC RAM (raw binary or .vmem text).
    image: PathBuf,

    /// Record a VCD waveform to <log_dir>/tb.vcd.
    #[arg(long)]
    vcd: bool,

    /// Record an execution trace to <log_dir>/tb.trace.
    #[arg(long)]
    trace: bool,

    /// JSON configuration file (defaults apply to absent fields).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after N cycles even if the design never signals completion.
    #[arg(long)]
    max_cycles: Option<u64>,
}

/// Demonstration firmware: greet, arm a periodic timer interrupt, then
/// spin while the callback reports the timer value halves on every fire.
struct HelloFirmware {
    timer: TimerService,
    step: u64,
}

impl HelloFirmware {
    fn new() -> Self {
        Self {
            timer: TimerService::new(),
            step: 0,
        }
    }
}

/// Timer interval in timer ticks; the actual timebase is a bit
/// meaningless in simulation.
const TICK_INTERVAL: u64 = 200_000;

impl Firmware for HelloFirmware {
    fn step(&mut self, m: &mut dyn Machine) -> Result<(), Trap> {
        match self.step {
            0 => console::write_str(m, "Hello simple system\n\n\n"),
            1 => self.timer.enable(
                m,
                TICK_INTERVAL,
                Box::new(|m| {
                    let now = timer::read_time(m);
                    console::write_str(m, "Timer interrupt!, high =");
                    console::write_dec(m, (now >> 32) as u32);
                    console::write_str(m, ", low=");
                    console::write_dec(m, now as u32);
                    console::write_str(m, " \n");
                }),
            ),
            2 => console::write_str(m, "Enabled the timer\n"),
            _ => {}
        }
        self.step += 1;
        Ok(())
    }

    fn on_timer_irq(&mut self, m: &mut dyn Machine) {
        self.timer.handle_interrupt(m);
    }
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: cannot read config '{}': {e}", path.display());
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: bad config '{}': {e}", path.display());
        process::exit(1);
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let system = SimpleSystem::new(&config, Box::new(HelloFirmware::new()));
    let mut driver = Driver::new(system, &config);

    let traces = TraceOptions {
        waveform: cli.vcd,
        instruction: cli.trace,
    };

    match driver.run_for(&cli.image, traces, cli.max_cycles) {
        Ok(summary) => {
            if summary.finished {
                println!("[*] simulation finished after {} cycles", summary.cycles);
            } else {
                println!(
                    "[*] cycle limit reached after {} cycles, stopping",
                    summary.cycles
                );
            }
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            process::exit(1);
        }
    }
}
