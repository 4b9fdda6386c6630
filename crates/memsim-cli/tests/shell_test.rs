#![cfg(test)]

use std::num::NonZeroUsize;

use memsim::{FitPolicy, MemoryConfig, ProcessId, Simulator};
use memsim_cli::shell::{DisplayConfig, Shell};

fn display() -> DisplayConfig {
    DisplayConfig {
        granularity: NonZeroUsize::new(100).unwrap(),
        width: NonZeroUsize::new(60).unwrap(),
        color: false,
    }
}

fn run_script(script: &str) -> (Simulator, String) {
    let sim = Simulator::new(MemoryConfig::new(1000, 100).unwrap());
    let mut shell = Shell::new(sim, display(), script.as_bytes(), Vec::new());
    shell.run().unwrap();
    let sim = shell.simulator().clone();
    let output = String::from_utf8(shell.into_output()).unwrap();
    (sim, output)
}

#[test]
fn exit_immediately() {
    let (_, output) = run_script("0\n");
    assert!(output.contains("1) Contiguous dynamic allocation"));
    assert!(output.contains("2) Pure paging"));
}

#[test]
fn eof_ends_session() {
    let (_, output) = run_script("");
    assert!(output.ends_with("> "));
    let (_, output) = run_script("1\n1\n");
    assert!(output.ends_with("Process size in bytes: "));
}

#[test]
fn contiguous_create_and_remove() {
    let (sim, output) = run_script("1\n1\n400\n1\n300\n2\n1\n0\n0\n");
    assert!(output.contains("Process 1 created"));
    assert!(output.contains("Process 2 created"));
    assert!(output.contains("Process 1 removed"));
    assert!(output.contains("PID 2 | Base 400 | Limit 300"));
    assert!(output.contains("External fragmentation: 30.00%"));
    assert!(output.contains("[....###...]"));
    assert!(sim.contiguous().process(ProcessId::new(1)).is_none());
}

#[test]
fn contiguous_reports_failures() {
    let (sim, output) = run_script("1\n1\nabc\n1\n5000\n1\n0\n2\n9\n9\n0\n0\n");
    assert!(output.contains("Invalid number: \"abc\""));
    assert!(output.contains("Allocation failed: no free interval can hold 5000 bytes"));
    assert!(output.contains("Allocation failed: cannot allocate an empty process"));
    assert!(output.contains("Removal failed: process 9 is not allocated"));
    assert!(output.contains("Unknown option: 9"));
    assert_eq!(sim.next_pid(), ProcessId::new(1));
}

#[test]
fn change_policy() {
    let (sim, output) = run_script("1\n3\nworst\n3\nrandom\n0\n0\n");
    assert!(output.contains("Policy set to worst"));
    assert!(output.contains("unknown fit policy \"random\""));
    assert!(output.contains("Contiguous mode (policy: worst)"));
    assert_eq!(sim.policy(), FitPolicy::Worst);
}

#[test]
fn paging_create_and_show_table() {
    let (sim, output) = run_script("2\n1\n250\n3\n1\n3\n7\n0\n0\n");
    assert!(output.contains("Paging mode (page size: 100 bytes, 10 frames)"));
    assert!(output.contains("Process 1 created"));
    assert!(output.contains("PID 1 | 250 bytes | 3 pages"));
    assert!(output.contains("Internal fragmentation: 5.00%"));
    assert!(output.contains("External fragmentation: 0.00%"));
    assert!(output.contains("[###.......]"));
    assert!(output.contains("Page 0 -> Frame 0\nPage 1 -> Frame 1\nPage 2 -> Frame 2\n"));
    assert!(output.contains("No page table for PID 7"));
    assert_eq!(sim.paging().free_frame_count(), 7);
}

#[test]
fn paging_insufficient_frames_and_remove() {
    let (sim, output) = run_script("2\n1\n1001\n1\n1000\n2\n1\n0\n0\n");
    assert!(output.contains("Allocation failed: 11 frames required but only 10 are free"));
    assert!(output.contains("Process 1 created"));
    assert!(output.contains("Process 1 removed"));
    assert_eq!(sim.paging().free_frame_count(), 10);
}

#[test]
fn ids_continue_across_modes() {
    let (sim, output) = run_script("1\n1\n100\n0\n2\n1\n100\n0\n0\n");
    assert!(output.contains("Process 1 created"));
    assert!(output.contains("Process 2 created"));
    assert_eq!(sim.paging().page_table_for(ProcessId::new(2)).len(), 1);
}
