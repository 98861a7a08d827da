//! The functional simulator: executes instructions one at a time with no
//! pipelining. This is the reference model every pipelined mode's final
//! architectural state must match.

use tracing::{debug, trace, warn};

use crate::alu::{alu, AluOutput};
use crate::arch::ArchState;
use crate::error::SimulatorResult;
use crate::instruction::{Decoded, Instruction, Opcode};
use crate::stats::Stats;

/// Runs `arch` to completion (HALT, or running off the end of `program_len`
/// words). Returns the final statistics; `arch` holds the final register
/// and memory state on return.
pub fn run(arch: &mut ArchState, program_len: usize) -> SimulatorResult<Stats> {
    let mut stats = Stats::default();

    loop {
        if (arch.pc / 4) as usize >= program_len {
            warn!(pc = arch.pc, "functional simulation ran off the end without HALT");
            stats.pc_at_end = arch.pc;
            stats.halted = false;
            return Ok(stats);
        }

        let raw = arch.memory.read(arch.pc as i64)?;
        let inst = Instruction::decode(raw, arch.pc)?;
        trace!(pc = arch.pc, opcode = %inst.opcode, "fetch");

        let (op1, op2) = read_operands(&inst, arch);
        let result = alu(&inst, op1, op2);

        match result {
            AluOutput::Value(value) => {
                if let Some(rd) = inst.dest() {
                    arch.registers.write(rd, value);
                }
                stats.retire(&inst);
                arch.pc += 4;
            }
            AluOutput::Address(address) => {
                match inst.decoded {
                    Decoded::Load { rt, .. } => {
                        let word = arch.memory.read(address)?;
                        arch.registers.write(rt, word as i32);
                    }
                    Decoded::Store { rt, .. } => {
                        let value = arch.registers.read(rt) as u32;
                        arch.memory.write(address, value)?;
                    }
                    _ => unreachable!("only Load/Store produce an Address"),
                }
                stats.retire(&inst);
                arch.pc += 4;
            }
            AluOutput::Branch { taken, target } => {
                debug!(pc = arch.pc, taken, target, "control transfer");
                stats.retire(&inst);
                arch.pc = if taken { target } else { arch.pc + 4 };
            }
            AluOutput::None => {
                // PC at termination is the address of the HALT instruction
                // itself, not the next instruction's address.
                stats.retire(&inst);
                stats.pc_at_end = inst.pc;
                stats.halted = true;
                return Ok(stats);
            }
        }

        stats.cycle_count += 1;
    }
}

fn read_operands(inst: &Instruction, arch: &ArchState) -> (i32, i32) {
    match inst.decoded {
        Decoded::RArith { rs, rt, .. } | Decoded::BranchEq { rs, rt, .. } => {
            (arch.registers.read(rs), arch.registers.read(rt))
        }
        Decoded::IArith { rs, imm, .. } => (arch.registers.read(rs), imm),
        Decoded::Load { rs, imm, .. } => (arch.registers.read(rs), imm),
        Decoded::Store { rs, imm, .. } => (arch.registers.read(rs), imm),
        Decoded::BranchZero { rs, .. } => (arch.registers.read(rs), 0),
        Decoded::Jump { rs } => (arch.registers.read(rs), 0),
        Decoded::Halt => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(opcode: u32, rs: u32, rt: u32, rd_or_imm: u32) -> u32 {
        (opcode << 26) | (rs << 21) | (rt << 16) | rd_or_imm
    }

    /// Arithmetic chain: each instruction depends on the previous result.
    #[test]
    fn arithmetic_chain() {
        let program = vec![
            word(0x01, 0, 1, 5),              // ADDI R1, R0, 5
            word(0x01, 0, 2, 3),               // ADDI R2, R0, 3
            (0x00 << 26) | (1 << 21) | (2 << 16) | (3 << 11), // ADD R3, R1, R2
            0x11 << 26,                        // HALT
        ];
        let mut arch = ArchState::new(&program);
        let stats = run(&mut arch, program.len()).unwrap();
        assert_eq!(arch.registers.read(1), 5);
        assert_eq!(arch.registers.read(2), 3);
        assert_eq!(arch.registers.read(3), 8);
        assert_eq!(stats.total_instructions, 4);
        assert!(stats.halted);
        assert_eq!(stats.pc_at_end, 12);
    }

    /// A taken branch skips two instructions.
    #[test]
    fn taken_branch_skips_instructions() {
        let program = vec![
            word(0x01, 0, 1, 0),  // ADDI R1, R0, 0
            word(0x0E, 1, 0, 2),  // BZ R1, +2
            word(0x01, 0, 2, 99), // ADDI R2, R0, 99 (skipped)
            word(0x01, 0, 3, 99), // ADDI R3, R0, 99 (skipped)
            word(0x01, 0, 4, 7),  // ADDI R4, R0, 7
            0x11 << 26,           // HALT
        ];
        let mut arch = ArchState::new(&program);
        run(&mut arch, program.len()).unwrap();
        assert_eq!(arch.registers.read(1), 0);
        assert_eq!(arch.registers.read(2), 0);
        assert_eq!(arch.registers.read(3), 0);
        assert_eq!(arch.registers.read(4), 7);
    }

    /// An untaken branch falls through normally.
    #[test]
    fn untaken_branch_falls_through() {
        let program = vec![
            word(0x01, 0, 1, 1),  // ADDI R1, R0, 1
            word(0x0E, 1, 0, 2),  // BZ R1, +2
            word(0x01, 0, 2, 99), // ADDI R2, R0, 99
            word(0x01, 0, 3, 99), // ADDI R3, R0, 99
            word(0x01, 0, 4, 7),  // ADDI R4, R0, 7
            0x11 << 26,
        ];
        let mut arch = ArchState::new(&program);
        run(&mut arch, program.len()).unwrap();
        assert_eq!(arch.registers.read(2), 99);
        assert_eq!(arch.registers.read(3), 99);
        assert_eq!(arch.registers.read(4), 7);
    }

    #[test]
    fn warns_and_exits_cleanly_without_halt() {
        let program = vec![word(0x01, 0, 1, 5)];
        let mut arch = ArchState::new(&program);
        let stats = run(&mut arch, program.len()).unwrap();
        assert!(!stats.halted);
        assert_eq!(stats.pc_at_end, 4);
    }
}
