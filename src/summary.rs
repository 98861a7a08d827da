//! Textual summary formatting, in a fixed field order: total and per-class
//! instruction counts, PC at termination, every register written at least
//! once, total data-hazard stalls, every memory word written at least
//! once, total clock cycles, and a "Program Halted" marker.

use std::fmt::Write as _;

use crate::arch::{Memory, Registers};
use crate::stats::Stats;

/// Renders the run's summary as a single string, ready to print.
pub fn format_summary(stats: &Stats, registers: &Registers, memory: &Memory) -> String {
    let mut out = String::new();

    writeln!(out, "Total instructions executed: {}", stats.total_instructions).unwrap();
    writeln!(out, "  Arithmetic: {}", stats.arithmetic_count).unwrap();
    writeln!(out, "  Logical:    {}", stats.logical_count).unwrap();
    writeln!(out, "  Memory:     {}", stats.memory_count).unwrap();
    writeln!(out, "  Control:    {}", stats.control_count).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "PC at termination: {:#010x}", stats.pc_at_end).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "Registers (written at least once):").unwrap();
    for (index, value) in registers.written_iter() {
        writeln!(out, "  R{index} = {value} ({value:#010x})").unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "Data-hazard stalls: {}", stats.stall_count).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "Memory (written at least once):").unwrap();
    for (address, value) in memory.modified_iter() {
        writeln!(out, "  [{address:#06x}] = {value:#010x}").unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "Total clock cycles: {}", stats.cycle_count).unwrap();

    if stats.halted {
        writeln!(out, "Program Halted").unwrap();
    } else {
        writeln!(out, "[WARN] Program ran off the end of the image without executing HALT").unwrap();
    }

    out
}
