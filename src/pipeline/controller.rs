//! The 5-stage pipeline controller: IF, ID, EX, MEM, WB with a classic
//! double-buffered `current`/`next` latch pair. Stages are evaluated in
//! WB -> MEM -> EX -> ID -> IF order each cycle so that a stage never reads
//! a latch already overwritten this cycle; a taken branch/jump resolved in
//! EX then squashes whatever IF and ID just produced into `next` — exactly
//! the two slots in flight behind the branch.

use tracing::{debug, trace, warn};

use crate::alu::{alu, AluOutput};
use crate::arch::ArchState;
use crate::error::SimulatorResult;
use crate::instruction::{Decoded, Instruction};
use crate::pipeline::hazard::{load_use_stall, no_forward_stall, resolve_forward, ForwardSource};
use crate::pipeline::registers::{ExMemSlot, IdExSlot, IfIdSlot, MemWbSlot, PipelineState};
use crate::stats::Stats;

/// Which hazard-resolution strategy the controller should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardMode {
    NoForwarding,
    Forwarding,
}

/// Runs the pipelined simulator to completion. Mirrors `functional::run`'s
/// contract: `arch` holds the final architectural state on return, and
/// `program_len` bounds fetch the same way.
pub fn run(arch: &mut ArchState, program_len: usize, mode: HazardMode) -> SimulatorResult<Stats> {
    let mut current = PipelineState::default();
    let mut fetch_pc = arch.pc;
    let mut fetch_exhausted = false;
    let mut stats = Stats::default();

    loop {
        let mut next = PipelineState::default();

        // ---- WB ----
        if current.mem_wb.valid {
            let inst = current.mem_wb.inst.expect("valid mem_wb slot carries an instruction");
            if let Some(rd) = inst.dest() {
                arch.registers.write(rd, current.mem_wb.wb_value);
            }
            stats.retire(&inst);
            if matches!(inst.decoded, Decoded::Halt) {
                debug!(pc = inst.pc, "HALT retired");
                stats.pc_at_end = inst.pc;
                stats.halted = true;
                return Ok(stats);
            }
        }

        // ---- MEM ----
        if current.ex_mem.valid {
            let inst = current.ex_mem.inst.expect("valid ex_mem slot carries an instruction");
            let wb_value = match inst.decoded {
                Decoded::Load { .. } => arch.memory.read(current.ex_mem.address)? as i32,
                Decoded::Store { .. } => {
                    arch.memory.write(current.ex_mem.address, current.ex_mem.store_value as u32)?;
                    0
                }
                _ => current.ex_mem.alu_value,
            };
            next.mem_wb = MemWbSlot { valid: true, pc: current.ex_mem.pc, inst: Some(inst), wb_value };
        }

        // ---- EX ----
        let mut branch_taken = false;
        let mut branch_target = 0u32;
        if current.id_ex.valid {
            let inst = current.id_ex.inst.expect("valid id_ex slot carries an instruction");
            let (op1, op2) = match mode {
                HazardMode::Forwarding => forward_operands(
                    &inst,
                    current.id_ex.op1,
                    current.id_ex.op2,
                    current.ex_mem.valid.then_some(&current.ex_mem),
                    current.mem_wb.valid.then_some(&current.mem_wb),
                ),
                HazardMode::NoForwarding => (current.id_ex.op1, current.id_ex.op2),
            };

            let result = alu(&inst, op1, op2);
            let mut slot = ExMemSlot { valid: true, pc: current.id_ex.pc, inst: Some(inst), ..Default::default() };
            match result {
                AluOutput::Value(v) => slot.alu_value = v,
                AluOutput::Address(a) => {
                    slot.address = a;
                    slot.store_value = op2;
                }
                AluOutput::Branch { taken, target } => {
                    slot.branch_taken = taken;
                    slot.branch_target = target;
                    if taken {
                        branch_taken = true;
                        branch_target = target;
                    }
                }
                AluOutput::None => {}
            }
            next.ex_mem = slot;
        }

        // ---- hazard check + ID + IF ----
        if current.if_id.valid {
            let consumer = Instruction::decode(current.if_id.raw, current.if_id.pc)?;
            let ex_producer = current.id_ex.valid.then(|| current.id_ex.inst.unwrap());
            let mem_producer = current.ex_mem.valid.then(|| current.ex_mem.inst.unwrap());

            let must_stall = match mode {
                HazardMode::NoForwarding => {
                    no_forward_stall(&consumer, ex_producer.as_ref(), mem_producer.as_ref()) > 0
                }
                HazardMode::Forwarding => load_use_stall(&consumer, ex_producer.as_ref()),
            };

            if must_stall {
                trace!(pc = current.if_id.pc, "stall");
                stats.stall_count += 1;
                next.if_id = current.if_id;
                // next.id_ex stays a bubble (default): no instruction enters EX this cycle.
            } else {
                let (op1, op2) = base_operands(&consumer, arch);
                next.id_ex = IdExSlot { valid: true, pc: current.if_id.pc, inst: Some(consumer), op1, op2 };
                fetch(&mut next.if_id, &mut fetch_pc, &mut fetch_exhausted, arch, program_len)?;
            }
        } else {
            fetch(&mut next.if_id, &mut fetch_pc, &mut fetch_exhausted, arch, program_len)?;
        }

        if branch_taken {
            debug!(target = branch_target, "branch/jump taken, squashing IF and ID");
            next.if_id = IfIdSlot::default();
            next.id_ex = IdExSlot::default();
            fetch_pc = branch_target;
            fetch_exhausted = false;
        }

        stats.cycle_count += 1;
        current = next;

        if fetch_exhausted
            && !current.if_id.valid
            && !current.id_ex.valid
            && !current.ex_mem.valid
            && !current.mem_wb.valid
        {
            warn!("pipelined simulation drained without HALT");
            stats.pc_at_end = fetch_pc;
            stats.halted = false;
            return Ok(stats);
        }
    }
}

fn fetch(
    slot: &mut IfIdSlot,
    fetch_pc: &mut u32,
    fetch_exhausted: &mut bool,
    arch: &ArchState,
    program_len: usize,
) -> SimulatorResult<()> {
    if (*fetch_pc / 4) as usize >= program_len {
        *fetch_exhausted = true;
        return Ok(());
    }
    let raw = arch.memory.read(*fetch_pc as i64)?;
    *slot = IfIdSlot { valid: true, pc: *fetch_pc, raw };
    *fetch_pc += 4;
    Ok(())
}

fn base_operands(inst: &Instruction, arch: &ArchState) -> (i32, i32) {
    match inst.decoded {
        Decoded::RArith { rs, rt, .. } | Decoded::BranchEq { rs, rt, .. } => {
            (arch.registers.read(rs), arch.registers.read(rt))
        }
        Decoded::IArith { rs, imm, .. } => (arch.registers.read(rs), imm),
        Decoded::Load { rs, imm, .. } => (arch.registers.read(rs), imm),
        Decoded::Store { rs, rt, .. } => (arch.registers.read(rs), arch.registers.read(rt)),
        Decoded::BranchZero { rs, .. } => (arch.registers.read(rs), 0),
        Decoded::Jump { rs } => (arch.registers.read(rs), 0),
        Decoded::Halt => (0, 0),
    }
}

/// Replaces `base_op1`/`base_op2` with forwarded values where `consumer`'s
/// source registers match a producer sitting in EX/MEM or MEM/WB.
fn forward_operands(
    consumer: &Instruction,
    base_op1: i32,
    base_op2: i32,
    ex_mem: Option<&ExMemSlot>,
    mem_wb: Option<&MemWbSlot>,
) -> (i32, i32) {
    let (src1, src2) = consumer.sources();
    let ex_producer = ex_mem.and_then(|s| s.inst.as_ref());
    let mem_producer = mem_wb.and_then(|s| s.inst.as_ref());

    let forward = |reg: u8| -> i32 {
        match resolve_forward(reg, ex_producer, mem_producer) {
            ForwardSource::ExMem => ex_mem.expect("ExMem source implies slot present").alu_value,
            ForwardSource::MemWb => mem_wb.expect("MemWb source implies slot present").wb_value,
            ForwardSource::RegisterFile => unreachable!("caller only forwards matched sources"),
        }
    };

    let op1 = match src1 {
        Some(r) if resolve_forward(r, ex_producer, mem_producer) != ForwardSource::RegisterFile => forward(r),
        _ => base_op1,
    };
    let op2 = match src2 {
        Some(r) if resolve_forward(r, ex_producer, mem_producer) != ForwardSource::RegisterFile => forward(r),
        _ => base_op2,
    };
    (op1, op2)
}
