//! Driver loop tests: startup failures, waveform timing, and the
//! end-to-end scenarios through the behavioral SoC.

use std::fs;
use std::path::Path;

use cosim_core::error::SimError;
use cosim_core::sim::driver::TraceOptions;
use cosim_core::soc::hart::{cause, Trap};
use cosim_core::{Driver, SimpleSystem};

use crate::common::firmware::{FaultAfter, HaltImmediately, PeriodicTicker};
use crate::common::mocks::NullDut;
use crate::common::{dummy_image, test_config};

const BOTH_SINKS: TraceOptions = TraceOptions {
    waveform: true,
    instruction: true,
};

#[test]
fn missing_image_aborts_before_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let mut driver = Driver::new(NullDut::new(), &config);
    let err = driver
        .run(Path::new("no/such/image.bin"), TraceOptions::default())
        .unwrap_err();
    assert!(matches!(err, SimError::Load { .. }), "got {err}");
    assert_eq!(driver.dut().posedges, 0, "the clock loop must not start");
    assert!(driver.dut().loads.is_empty());
}

#[test]
fn image_is_preloaded_into_the_configured_region() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let mut driver = Driver::new(NullDut::finishing_after(1), &config);
    driver.run(&image, TraceOptions::default()).unwrap();
    assert_eq!(driver.dut().loads, vec![("ram0".to_string(), 4)]);
}

#[test]
fn waveform_samples_every_half_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let mut driver = Driver::new(NullDut::finishing_after(3), &config);
    let summary = driver
        .run(
            &image,
            TraceOptions {
                waveform: true,
                instruction: false,
            },
        )
        .unwrap();
    assert!(summary.finished);
    assert_eq!(summary.cycles, 3);

    let vcd = fs::read_to_string(config.output.waveform_path()).unwrap();
    let times: Vec<u64> = vcd
        .lines()
        .filter_map(|l| l.strip_prefix('#'))
        .map(|t| t.parse().unwrap())
        .collect();
    assert_eq!(times, vec![0, 5, 10, 15, 20, 25]);
}

#[test]
fn no_artifacts_when_sinks_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let mut driver = Driver::new(NullDut::finishing_after(2), &config);
    driver.run(&image, TraceOptions::default()).unwrap();
    assert!(!config.output.waveform_path().exists());
    assert!(!config.output.trace_path().exists());
}

#[test]
fn ctrl_write_terminates_with_sinks_flushed() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let system = SimpleSystem::new(&config, Box::new(HaltImmediately));
    let mut driver = Driver::new(system, &config);
    let summary = driver.run(&image, BOTH_SINKS).unwrap();

    assert!(summary.finished);
    // Reset window is cycles 0..4, the halting step runs at cycle 4, the
    // finished signal is observed at the top of cycle 5.
    assert_eq!(summary.cycles, 5);

    let vcd = fs::read_to_string(config.output.waveform_path()).unwrap();
    assert!(vcd.contains("$enddefinitions"));
    assert!(vcd.contains("#45"), "samples up to the last cycle:\n{vcd}");

    let trace = fs::read_to_string(config.output.trace_path()).unwrap();
    assert!(trace.contains("step  pc=0x00100000"), "trace:\n{trace}");
}

#[test]
fn timer_firmware_fires_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let firmware = PeriodicTicker::new(50);
    let fires = firmware.fires.clone();
    let system = SimpleSystem::new(&config, Box::new(firmware));
    let mut driver = Driver::new(system, &config);

    // The program never halts; the cycle bound stands in for external
    // termination.
    let summary = driver.run_for(&image, TraceOptions::default(), Some(400)).unwrap();
    assert!(!summary.finished);
    assert_eq!(summary.cycles, 400);

    assert!(fires.get() >= 2, "expected repeated fires, got {}", fires.get());
    let console = driver.dut().console_output();
    assert!(
        console.contains("Timer interrupt!, high =0, low="),
        "console:\n{console}"
    );
    // The compare register is re-armed into the future after every fire.
    assert!(driver.dut().mtimecmp() > driver.dut().mtime() - 50);
}

#[test]
fn disable_stops_future_fires_while_time_advances() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let firmware = PeriodicTicker::disabling_after(30, 2);
    let fires = firmware.fires.clone();
    let system = SimpleSystem::new(&config, Box::new(firmware));
    let mut driver = Driver::new(system, &config);

    driver.run_for(&image, TraceOptions::default(), Some(600)).unwrap();

    assert_eq!(fires.get(), 2, "no fires after disable");
    assert!(
        driver.dut().mtime() > 500,
        "time keeps advancing after disable"
    );
}

#[test]
fn illegal_instruction_dumps_snapshot_and_halts() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let image = dummy_image(dir.path());
    let firmware = FaultAfter::new(
        2,
        Trap {
            cause: cause::ILLEGAL_INSTRUCTION,
            value: 0xDEAD_BEEF,
        },
    );
    let system = SimpleSystem::new(&config, Box::new(firmware));
    let mut driver = Driver::new(system, &config);
    let summary = driver.run(&image, TraceOptions::default()).unwrap();

    assert!(summary.finished, "fail-stop handler must halt the run");
    let console = driver.dut().console_output();
    assert!(console.contains("EXCEPTION!!!"), "console:\n{console}");
    // Two retired steps before the fault: mepc = ram base + 8.
    assert!(console.contains("MEPC:   0x00100008"), "console:\n{console}");
    assert!(console.contains("MCAUSE: 0x00000002"), "console:\n{console}");
    assert!(console.contains("MTVAL:  0xdeadbeef"), "console:\n{console}");
    assert!(driver.dut().hart().parked, "the hart spins after fail-stop");
}
