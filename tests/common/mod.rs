//! Shared instruction-encoding helpers for integration tests. Encodes
//! straight from the opcode field layout, independent of the library's
//! own decoder, so a bug shared between encoder and decoder would not
//! hide a test failure.

pub fn r_type(opcode: u32, rs: u32, rt: u32, rd: u32) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (rd << 11)
}

pub fn i_type(opcode: u32, rs: u32, rt: u32, imm: i32) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

pub fn addi(rt: u32, rs: u32, imm: i32) -> u32 {
    i_type(0x01, rs, rt, imm)
}

pub fn add(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x00, rs, rt, rd)
}

pub fn stw(rs: u32, rt: u32, imm: i32) -> u32 {
    i_type(0x0D, rs, rt, imm)
}

pub fn ldw(rt: u32, rs: u32, imm: i32) -> u32 {
    i_type(0x0C, rs, rt, imm)
}

pub fn bz(rs: u32, imm: i32) -> u32 {
    i_type(0x0E, rs, 0, imm)
}

pub fn jr(rs: u32) -> u32 {
    i_type(0x10, rs, 0, 0)
}

pub const HALT: u32 = 0x11 << 26;
