//! Timer runtime: coherent time reads, compare updates, periodic interrupts.
//!
//! The timer exposes its 64-bit counters as independent 32-bit register
//! halves, so both the read and the write side need care:
//! - [`read_time`] re-reads the high half until two consecutive reads
//!   match, guarding against a carry between the half reads.
//! - [`set_compare`] parks the low half at an all-ones sentinel before
//!   touching the high half, so the continuously-evaluated 64-bit compare
//!   never sees a transient false match.
//!
//! [`TimerService`] layers a single-slot periodic interrupt on top:
//! `enable` arms the compare at `now + interval` and unmasks the
//! interrupt, `handle_interrupt` re-arms from the time at fire (not from
//! the previous compare, so handler latency does not accumulate) and
//! invokes the registered callback once.

use crate::regs;
use crate::runtime::Machine;

/// Callback invoked once per timer fire, in handler context.
///
/// Must not block; runs with further timer interrupts deferred until the
/// handler returns.
pub type Callback = Box<dyn FnMut(&mut dyn Machine)>;

/// Reads the 64-bit hardware time from its two 32-bit register halves.
///
/// Reads high, then low, then high again; retries until the two high
/// reads match. The loop has no iteration cap: a repeated same-window
/// carry is the only way to loop twice, and the counter carries into the
/// high half once per 2^32 ticks.
pub fn read_time(m: &mut dyn Machine) -> u64 {
    loop {
        let high = m.read_reg(regs::TIMER_BASE + regs::TIMER_MTIMEH);
        let low = m.read_reg(regs::TIMER_BASE + regs::TIMER_MTIME);
        if m.read_reg(regs::TIMER_BASE + regs::TIMER_MTIMEH) == high {
            return (u64::from(high) << 32) | u64::from(low);
        }
    }
}

/// Writes the 64-bit compare value so that no spurious match is visible
/// while the two halves are in flight.
///
/// Write order is sentinel-low, high, final-low. Hardware evaluates the
/// 64-bit compare continuously from the two halves; collapsing this to
/// two writes reintroduces the transient-match race.
pub fn set_compare(m: &mut dyn Machine, deadline: u64) {
    m.write_reg(regs::TIMER_BASE + regs::TIMER_MTIMECMP, u32::MAX);
    m.write_reg(
        regs::TIMER_BASE + regs::TIMER_MTIMECMPH,
        (deadline >> 32) as u32,
    );
    m.write_reg(regs::TIMER_BASE + regs::TIMER_MTIMECMP, deadline as u32);
}

/// Single-slot periodic interrupt registry.
///
/// Exactly one callback registration exists at a time; calling
/// [`TimerService::enable`] again re-arms with the new interval and
/// replaces the callback (last registration wins, silently).
pub struct TimerService {
    increment: u64,
    callback: Option<Callback>,
}

impl TimerService {
    /// Creates an empty registry; nothing fires until `enable` is called.
    pub fn new() -> Self {
        Self {
            increment: 0,
            callback: None,
        }
    }

    /// Interval used to re-arm the compare register on every fire.
    pub fn increment(&self) -> u64 {
        self.increment
    }

    /// Arms the periodic interrupt.
    ///
    /// Stores `interval` and `callback`, arms the compare register at
    /// `read_time() + interval`, then unmasks the timer interrupt source
    /// and the global interrupt enable.
    pub fn enable(&mut self, m: &mut dyn Machine, interval: u64, callback: Callback) {
        self.increment = interval;
        self.callback = Some(callback);
        let now = read_time(m);
        set_compare(m, now.wrapping_add(interval));
        m.set_timer_irq_enabled(true);
        m.set_global_irq_enabled(true);
    }

    /// Masks the timer interrupt source.
    ///
    /// Leaves the global interrupt enable and the stored callback alone;
    /// other interrupt sources stay live.
    pub fn disable(&self, m: &mut dyn Machine) {
        m.set_timer_irq_enabled(false);
    }

    /// Timer-fire handler. Runs in trap context; not re-entrant.
    ///
    /// Re-arms the compare register at the time of fire plus the stored
    /// interval, then invokes the registered callback exactly once. A fire
    /// with no registered callback means the interrupt source was unmasked
    /// without a preceding `enable` — a design violation, flagged here
    /// rather than swallowed.
    pub fn handle_interrupt(&mut self, m: &mut dyn Machine) {
        let now = read_time(m);
        set_compare(m, now.wrapping_add(self.increment));
        debug_assert!(
            self.callback.is_some(),
            "timer fired with no registered callback"
        );
        if let Some(cb) = self.callback.as_mut() {
            cb(m);
        }
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}
