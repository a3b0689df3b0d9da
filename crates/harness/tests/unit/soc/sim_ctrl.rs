//! Simulation controller tests: halt register and diagnostic channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cosim_core::soc::devices::{Device, SimCtrl};

fn make_sim_ctrl() -> (SimCtrl, Arc<AtomicBool>) {
    let halt = Arc::new(AtomicBool::new(false));
    let ctrl = SimCtrl::new(0x0020_0000, halt.clone());
    (ctrl, halt)
}

#[test]
fn sim_ctrl_name_and_range() {
    let (ctrl, _) = make_sim_ctrl();
    assert_eq!(ctrl.name(), "sim_ctrl");
    assert_eq!(ctrl.address_range(), (0x0020_0000, 0x10));
}

#[test]
fn ctrl_write_one_requests_halt() {
    let (mut ctrl, halt) = make_sim_ctrl();
    ctrl.write_u32(0x8, 1);
    assert!(halt.load(Ordering::Relaxed));
}

#[test]
fn ctrl_other_values_ignored() {
    let (mut ctrl, halt) = make_sim_ctrl();
    ctrl.write_u32(0x8, 0);
    ctrl.write_u32(0x8, 2);
    ctrl.write_u32(0x8, 0xFFFF_FFFF);
    assert!(!halt.load(Ordering::Relaxed));
}

#[test]
fn ctrl_write_at_other_offsets_ignored() {
    let (mut ctrl, halt) = make_sim_ctrl();
    ctrl.write_u32(0x4, 1);
    ctrl.write_u32(0xC, 1);
    assert!(!halt.load(Ordering::Relaxed));
}

#[test]
fn out_accumulates_transcript() {
    let (mut ctrl, _) = make_sim_ctrl();
    for byte in b"hi\nthere" {
        ctrl.write_u32(0x0, u32::from(*byte));
    }
    assert_eq!(ctrl.output(), b"hi\nthere");
}

#[test]
fn out_takes_low_byte_only() {
    let (mut ctrl, _) = make_sim_ctrl();
    ctrl.write_u32(0x0, 0x1234_5641);
    assert_eq!(ctrl.output(), b"A");
}

#[test]
fn sim_ctrl_registers_are_write_only() {
    let (mut ctrl, _) = make_sim_ctrl();
    ctrl.write_u32(0x0, u32::from(b'x'));
    assert_eq!(ctrl.read_u32(0x0), 0);
    assert_eq!(ctrl.read_u32(0x8), 0);
    assert_eq!(ctrl.read_u8(0x0), 0);
}

#[test]
fn write_u8_feeds_the_channel() {
    let (mut ctrl, halt) = make_sim_ctrl();
    ctrl.write_u8(0x0, b'y');
    assert_eq!(ctrl.output(), b"y");
    ctrl.write_u8(0x8, 1);
    assert!(halt.load(Ordering::Relaxed));
}
