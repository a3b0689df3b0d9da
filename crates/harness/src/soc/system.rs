//! Top-level system assembly.
//!
//! [`SimpleSystem`] wires the bus, RAM, timer, and simulation controller
//! together with a behavioral hart and a firmware object, and presents
//! the whole design to the driver through the [`Dut`] contract: a clock
//! input, a reset input, a finished signal, one preloadable memory
//! region, and a signal sample for waveform capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::SimError;
use crate::sim::dut::{Dut, Signal};
use crate::soc::bus::Bus;
use crate::soc::devices::{Ram, SimCtrl, Timer};
use crate::soc::hart::{cause, Firmware, Hart, MachineCtx};

/// Behavioral SoC: bus, devices, hart, and firmware.
pub struct SimpleSystem {
    bus: Bus,
    hart: Hart,
    firmware: Box<dyn Firmware>,
    halt: Arc<AtomicBool>,
    reset_pc: u32,
    clk: bool,
    prev_clk: bool,
    reset_n: bool,
    /// Becomes true once reset has been observed asserted; nothing
    /// executes before the assert/release sequence completes.
    reset_seen: bool,
    cycle: u64,
    timer_irq: bool,
    trace_lines: Vec<String>,
}

impl SimpleSystem {
    /// Assembles the system from configuration.
    pub fn new(config: &Config, firmware: Box<dyn Firmware>) -> Self {
        let halt = Arc::new(AtomicBool::new(false));
        let sys = &config.system;

        let mut bus = Bus::new();
        bus.add_device(Box::new(Ram::new(
            &sys.load_region,
            sys.ram_base,
            sys.ram_size,
        )));
        bus.add_device(Box::new(Timer::new(sys.timer_base, sys.timer_divider)));
        bus.add_device(Box::new(SimCtrl::new(sys.sim_ctrl_base, halt.clone())));

        Self {
            bus,
            hart: Hart::new(sys.ram_base),
            firmware,
            halt,
            reset_pc: sys.ram_base,
            clk: false,
            prev_clk: false,
            reset_n: true,
            reset_seen: false,
            cycle: 0,
            timer_irq: false,
            trace_lines: Vec::new(),
        }
    }

    /// Full diagnostic transcript written through the OUT register.
    pub fn console_output(&self) -> String {
        self.bus
            .sim_ctrl()
            .map(|ctrl| String::from_utf8_lossy(ctrl.output()).into_owned())
            .unwrap_or_default()
    }

    /// Current value of the hardware time counter.
    pub fn mtime(&self) -> u64 {
        self.bus.timer().map_or(0, Timer::now)
    }

    /// Current value of the timer compare register.
    pub fn mtimecmp(&self) -> u64 {
        self.bus.timer().map_or(u64::MAX, Timer::compare)
    }

    /// Hart architectural state, for harness inspection.
    pub fn hart(&self) -> &Hart {
        &self.hart
    }

    /// Rising-edge work: devices tick, then the hart takes the single
    /// preemption point or executes one firmware step.
    fn posedge(&mut self) {
        if !self.reset_n {
            self.reset_seen = true;
            self.hart.reset(self.reset_pc);
            return;
        }
        if !self.reset_seen {
            // Power-on window before reset assertion; nothing runs.
            return;
        }

        self.cycle += 1;
        self.timer_irq = self.bus.tick();

        if self.hart.parked {
            return;
        }

        if self.timer_irq && self.hart.timer_irq_deliverable() {
            self.hart.enter_trap(cause::MACHINE_TIMER_INTERRUPT, 0);
            self.trace_lines
                .push(format!("{:>10}  irq   mcause={:#010x}", self.cycle, self.hart.mcause));
            let mut ctx = MachineCtx {
                hart: &mut self.hart,
                bus: &mut self.bus,
            };
            self.firmware.on_timer_irq(&mut ctx);
            self.hart.exit_trap();
            return;
        }

        self.trace_lines
            .push(format!("{:>10}  step  pc={:#010x}", self.cycle, self.hart.pc));
        let mut ctx = MachineCtx {
            hart: &mut self.hart,
            bus: &mut self.bus,
        };
        match self.firmware.step(&mut ctx) {
            Ok(()) => self.hart.pc = self.hart.pc.wrapping_add(4),
            Err(trap) => {
                self.hart.enter_trap(trap.cause, trap.value);
                self.trace_lines.push(format!(
                    "{:>10}  trap  mcause={:#010x} mtval={:#010x}",
                    self.cycle, trap.cause, trap.value
                ));
                let mut ctx = MachineCtx {
                    hart: &mut self.hart,
                    bus: &mut self.bus,
                };
                self.firmware.on_exception(&mut ctx);
                self.hart.exit_trap();
            }
        }
    }
}

impl Dut for SimpleSystem {
    fn set_clock(&mut self, high: bool) {
        self.clk = high;
    }

    fn set_reset_n(&mut self, level: bool) {
        self.reset_n = level;
    }

    fn eval(&mut self) {
        if self.clk && !self.prev_clk {
            self.posedge();
        }
        self.prev_clk = self.clk;
    }

    fn finished(&self) -> bool {
        self.halt.load(Ordering::Relaxed)
    }

    fn load_memory(&mut self, region: &str, image: &[u8]) -> Result<(), SimError> {
        self.bus.load_into(region, image)
    }

    fn signals(&self) -> Vec<Signal> {
        vec![
            Signal::bit("clk", self.clk),
            Signal::bit("rst_n", self.reset_n),
            Signal::bit("sim_finished", self.finished()),
            Signal::bit("timer_irq", self.timer_irq),
            Signal::vec("pc", 32, u64::from(self.hart.pc)),
            Signal::vec("mtime", 64, self.mtime()),
            Signal::vec("mtimecmp", 64, self.mtimecmp()),
        ]
    }

    fn drain_trace(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_lines)
    }
}
