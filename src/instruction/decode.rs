//! Decoding: a pure function from a 32-bit instruction word to a
//! `Decoded` instruction. Bit numbering is big-endian (bit 31 is the MSB).
//!
//! ```text
//! opcode: bits 31..26 (6 bits)
//! Rs:     bits 25..21 (5 bits)
//! Rt:     bits 20..16 (5 bits)
//! Rd:     bits 15..11 (5 bits, R-type only)
//! imm:    bits 15..0  (16 bits, sign-extended, I-type only)
//! ```

use super::{invalid, ArithOp, Decoded, Instruction, Opcode};
use crate::error::SimulatorResult;

fn opcode_bits(raw: u32) -> u32 {
    (raw >> 26) & 0x3F
}

fn rs(raw: u32) -> u8 {
    ((raw >> 21) & 0x1F) as u8
}

fn rt(raw: u32) -> u8 {
    ((raw >> 16) & 0x1F) as u8
}

fn rd(raw: u32) -> u8 {
    ((raw >> 11) & 0x1F) as u8
}

fn sign_extend_imm(raw: u32) -> i32 {
    (raw & 0xFFFF) as i16 as i32
}

/// Decodes a raw 32-bit instruction word fetched from `pc`.
pub fn decode(raw: u32, pc: u32) -> SimulatorResult<Instruction> {
    let opcode = Opcode::from_bits(opcode_bits(raw)).ok_or_else(|| invalid(raw, pc))?;

    let decoded = if opcode.is_r_type() {
        Decoded::RArith { op: arith_op(opcode), rs: rs(raw), rt: rt(raw), rd: rd(raw) }
    } else {
        let imm = sign_extend_imm(raw);
        match opcode {
            Opcode::Addi | Opcode::Subi | Opcode::Muli | Opcode::Ori | Opcode::Andi
            | Opcode::Xori => {
                Decoded::IArith { op: arith_op(opcode), rs: rs(raw), rt: rt(raw), imm }
            }
            Opcode::Ldw => Decoded::Load { rs: rs(raw), rt: rt(raw), imm },
            Opcode::Stw => Decoded::Store { rs: rs(raw), rt: rt(raw), imm },
            Opcode::Bz => Decoded::BranchZero { rs: rs(raw), imm },
            Opcode::Beq => Decoded::BranchEq { rs: rs(raw), rt: rt(raw), imm },
            Opcode::Jr => Decoded::Jump { rs: rs(raw) },
            Opcode::Halt => Decoded::Halt,
            _ => unreachable!("R-type opcodes handled above"),
        }
    };

    Ok(Instruction { raw, pc, opcode, decoded })
}

fn arith_op(opcode: Opcode) -> ArithOp {
    match opcode {
        Opcode::Add | Opcode::Addi => ArithOp::Add,
        Opcode::Sub | Opcode::Subi => ArithOp::Sub,
        Opcode::Mul | Opcode::Muli => ArithOp::Mul,
        Opcode::Or | Opcode::Ori => ArithOp::Or,
        Opcode::And | Opcode::Andi => ArithOp::And,
        Opcode::Xor | Opcode::Xori => ArithOp::Xor,
        _ => unreachable!("not an arithmetic/logic opcode"),
    }
}
