//! Timer device tests.
//!
//! Verifies register-pair access, the read-only MTIME, divider-based
//! counting, and the level interrupt condition.

use cosim_core::soc::devices::{Device, Timer};

#[test]
fn timer_name_and_range() {
    let timer = Timer::new(0x0030_0000, 1);
    assert_eq!(timer.name(), "timer0");
    assert_eq!(timer.address_range(), (0x0030_0000, 0x10));
}

#[test]
fn timer_initial_state() {
    let mut timer = Timer::new(0, 1);
    assert_eq!(timer.read_u32(0x0), 0, "mtime low starts at 0");
    assert_eq!(timer.read_u32(0x4), 0, "mtime high starts at 0");
    assert_eq!(timer.read_u32(0x8), 0xFFFF_FFFF, "mtimecmp resets to all-ones");
    assert_eq!(timer.read_u32(0xC), 0xFFFF_FFFF);
    assert!(!timer.irq_pending());
}

#[test]
fn timer_tick_increments_mtime() {
    let mut timer = Timer::new(0, 1);
    timer.tick();
    assert_eq!(timer.now(), 1);
    timer.tick();
    assert_eq!(timer.now(), 2);
}

#[test]
fn timer_divider_scales_ticks() {
    let mut timer = Timer::new(0, 10);
    for _ in 0..9 {
        timer.tick();
    }
    assert_eq!(timer.now(), 0);
    timer.tick();
    assert_eq!(timer.now(), 1);
}

#[test]
fn timer_divider_zero_behaves_as_one() {
    let mut timer = Timer::new(0, 0);
    timer.tick();
    assert_eq!(timer.now(), 1);
}

#[test]
fn timer_irq_level_asserted_at_compare() {
    let mut timer = Timer::new(0, 1);
    timer.write_u32(0x8, 5);
    timer.write_u32(0xC, 0);
    for _ in 0..4 {
        assert!(!timer.tick(), "no interrupt before mtime reaches mtimecmp");
    }
    assert!(timer.tick(), "interrupt when mtime >= mtimecmp");
    assert!(timer.tick(), "level interrupt stays asserted");
}

#[test]
fn timer_mtime_is_read_only() {
    let mut timer = Timer::new(0, 1);
    timer.tick();
    timer.write_u32(0x0, 0x1234);
    timer.write_u32(0x4, 0x5678);
    assert_eq!(timer.now(), 1, "writes to MTIME are dropped");
}

#[test]
fn timer_compare_halves_independent() {
    let mut timer = Timer::new(0, 1);
    timer.write_u32(0x8, 0x9ABC_DEF0);
    assert_eq!(timer.compare(), 0xFFFF_FFFF_9ABC_DEF0);
    timer.write_u32(0xC, 0x1234_5678);
    assert_eq!(timer.compare(), 0x1234_5678_9ABC_DEF0);
    assert_eq!(timer.read_u32(0x8), 0x9ABC_DEF0);
    assert_eq!(timer.read_u32(0xC), 0x1234_5678);
}

#[test]
fn timer_read_u8_extracts_bytes() {
    let mut timer = Timer::new(0, 1);
    timer.write_u32(0x8, 0x0403_0201);
    assert_eq!(timer.read_u8(0x8), 0x01);
    assert_eq!(timer.read_u8(0x9), 0x02);
    assert_eq!(timer.read_u8(0xA), 0x03);
    assert_eq!(timer.read_u8(0xB), 0x04);
}

#[test]
fn timer_unknown_offset_reads_zero() {
    let mut timer = Timer::new(0, 1);
    assert_eq!(timer.read_u32(0x10), 0);
}
