//! The hazard unit: pure functions deciding stalls and forwarding paths.
//!
//! None of these functions touch pipeline state directly — they take the
//! instructions occupying the relevant latches (or `None` for a bubble) and
//! return a stall count or a forwarding decision. The controller is the only
//! thing that actually applies their answers.

use crate::instruction::{Decoded, Instruction};

/// Where a consumer's operand should come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardSource {
    /// Read the value already latched from the register file at ID time.
    RegisterFile,
    /// Forward the ALU result sitting in EX/MEM (the closer producer).
    ExMem,
    /// Forward the write-back value sitting in MEM/WB (the farther
    /// producer).
    MemWb,
}

/// True if `producer` is a load and its destination is `reg`. Used both by
/// the no-forwarding stall rule and, separately, by the load-use stall rule
/// that applies even with forwarding enabled.
fn produces(producer: Option<&Instruction>, reg: u8) -> bool {
    producer.and_then(Instruction::dest) == Some(reg)
}

/// Without forwarding, a consumer about to enter ID must stall until its
/// sources are no longer in flight ahead of it: 2 cycles if the nearer
/// producer (about to enter EX) will write one of its sources, else 1 cycle
/// if the farther producer (about to enter MEM) will. A match in the
/// producer about to enter WB is not a hazard: WB always commits before
/// this check runs, so the register file is already current.
pub fn no_forward_stall(
    consumer: &Instruction,
    ex_producer: Option<&Instruction>,
    mem_producer: Option<&Instruction>,
) -> u32 {
    let (src1, src2) = consumer.sources();
    let hits = |producer: Option<&Instruction>| {
        [src1, src2].into_iter().flatten().any(|r| produces(producer, r))
    };
    if hits(ex_producer) {
        2
    } else if hits(mem_producer) {
        1
    } else {
        0
    }
}

/// With forwarding enabled, a load whose result is not yet computed can
/// still stall its immediate consumer by exactly one cycle: a load sitting
/// in ID/EX (about to enter EX) only has an effective address by the time
/// it reaches EX/MEM, not a loaded value, so EX-forwarding cannot supply it.
/// One stall lets the load advance into MEM/WB, where MEM-forwarding can
/// supply the loaded word instead.
pub fn load_use_stall(consumer: &Instruction, ex_producer: Option<&Instruction>) -> bool {
    let is_load = matches!(ex_producer.map(|i| &i.decoded), Some(Decoded::Load { .. }));
    if !is_load {
        return false;
    }
    let (src1, src2) = consumer.sources();
    [src1, src2].into_iter().flatten().any(|r| produces(ex_producer, r))
}

/// Resolves where `reg` (one of the consumer's source registers as it
/// enters EX) should be read from, given the two possible forwarding
/// producers. EX/MEM (the nearer producer, one stage ahead) takes priority
/// over MEM/WB (the farther producer, two stages ahead) since it holds the
/// more recently computed value.
pub fn resolve_forward(
    reg: u8,
    ex_mem_producer: Option<&Instruction>,
    mem_wb_producer: Option<&Instruction>,
) -> ForwardSource {
    if produces(ex_mem_producer, reg) {
        ForwardSource::ExMem
    } else if produces(mem_wb_producer, reg) {
        ForwardSource::MemWb
    } else {
        ForwardSource::RegisterFile
    }
}
