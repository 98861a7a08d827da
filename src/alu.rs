//! ALU / effective-address unit.
//!
//! A pure function: given a decoded instruction and its operand values, it
//! produces either an arithmetic/logical result, an effective memory
//! address, or a branch/jump outcome. It never touches architectural
//! state, and it never decides whether a branch's squash actually happens —
//! that is the pipeline controller's job (see `pipeline::controller`).

use crate::instruction::{Decoded, Instruction};

/// The result of running an instruction through the ALU.
#[derive(Clone, Copy, Debug)]
pub enum AluOutput {
    /// Arithmetic/logical result, destined for a register.
    Value(i32),
    /// Effective memory address for a load or store (signed, so the memory
    /// stage can detect a negative address as out-of-range).
    Address(i64),
    /// Branch or jump outcome.
    Branch { taken: bool, target: u32 },
    /// HALT has no ALU semantics.
    None,
}

/// Runs `inst` through the ALU given its operand values (`op1` is always
/// the Rs value; `op2` is the Rt value or sign-extended immediate,
/// whichever the instruction's second operand is).
pub fn alu(inst: &Instruction, op1: i32, op2: i32) -> AluOutput {
    match inst.decoded {
        Decoded::RArith { op, .. } | Decoded::IArith { op, .. } => {
            AluOutput::Value(op.apply(op1, op2))
        }
        Decoded::Load { imm, .. } | Decoded::Store { imm, .. } => {
            AluOutput::Address(op1 as i64 + imm as i64)
        }
        Decoded::BranchZero { imm, .. } => AluOutput::Branch {
            taken: op1 == 0,
            target: branch_target(inst.pc, imm),
        },
        Decoded::BranchEq { imm, .. } => AluOutput::Branch {
            taken: op1 == op2,
            target: branch_target(inst.pc, imm),
        },
        Decoded::Jump { .. } => AluOutput::Branch { taken: true, target: op1 as u32 },
        Decoded::Halt => AluOutput::None,
    }
}

fn branch_target(pc: u32, imm: i32) -> u32 {
    (pc as i64 + imm as i64 * 4) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    fn inst(raw: u32, pc: u32) -> Instruction {
        Instruction::decode(raw, pc).unwrap()
    }

    #[test]
    fn add_wraps_on_overflow() {
        let i = inst(0x00 << 26, 0); // ADD R0, R0, R0 (opcode only matters)
        match alu(&i, i32::MAX, 1) {
            AluOutput::Value(v) => assert_eq!(v, i32::MIN),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bz_targets_relative_to_own_pc() {
        // BZ R1, +2
        let raw = (0x0E << 26) | (1 << 21) | 2;
        let i = inst(raw, 40);
        match alu(&i, 0, 0) {
            AluOutput::Branch { taken: true, target } => assert_eq!(target, 40 + 8),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bz_not_taken_when_rs_nonzero() {
        let raw = (0x0E << 26) | (1 << 21) | 2;
        let i = inst(raw, 40);
        match alu(&i, 5, 0) {
            AluOutput::Branch { taken: false, .. } => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn jr_targets_rs_value_directly() {
        let raw = (0x10 << 26) | (7 << 21);
        let i = inst(raw, 0);
        match alu(&i, 0x100, 0) {
            AluOutput::Branch { taken: true, target: 0x100 } => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn load_computes_signed_effective_address() {
        let raw = (0x0C << 26) | (1 << 21) | (2 << 16) | 0xFFF0; // imm = -16
        let i = inst(raw, 0);
        match alu(&i, 8, 0) {
            AluOutput::Address(a) => assert_eq!(a, -8),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
