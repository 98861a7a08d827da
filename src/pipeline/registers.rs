//! Pipeline register (latch) state: the values carried between adjacent
//! stages. `PipelineState` is double-buffered by the controller — each
//! cycle computes a `next` state from the current one, then swaps.

use crate::instruction::Instruction;

/// IF/ID latch: the freshly fetched word, not yet decoded.
#[derive(Clone, Copy, Default)]
pub struct IfIdSlot {
    pub valid: bool,
    pub pc: u32,
    pub raw: u32,
}

/// ID/EX latch: a decoded instruction plus the operand values read from the
/// register file (before any forwarding is applied in EX).
#[derive(Clone, Copy, Default)]
pub struct IdExSlot {
    pub valid: bool,
    pub pc: u32,
    pub inst: Option<Instruction>,
    pub op1: i32,
    pub op2: i32,
}

/// EX/MEM latch: the ALU's output for an arithmetic/logical instruction, or
/// the effective address for a load/store, or the resolved branch outcome.
#[derive(Clone, Copy, Default)]
pub struct ExMemSlot {
    pub valid: bool,
    pub pc: u32,
    pub inst: Option<Instruction>,
    /// ALU result for an arithmetic/logical instruction. Not meaningful as
    /// a forwarding source for a load (its loaded value does not exist
    /// until MEM runs) — the hazard unit's load-use stall rule exists
    /// precisely to prevent that case from being reached.
    pub alu_value: i32,
    /// Effective address for a load/store.
    pub address: i64,
    /// Value to store, for STW (read from Rt at ID time, carried through
    /// unchanged — it is never itself a forwarding destination).
    pub store_value: i32,
    pub branch_taken: bool,
    pub branch_target: u32,
}

/// MEM/WB latch: the final value ready to commit to the register file.
#[derive(Clone, Copy, Default)]
pub struct MemWbSlot {
    pub valid: bool,
    pub pc: u32,
    pub inst: Option<Instruction>,
    pub wb_value: i32,
}

/// The full set of pipeline latches for one cycle.
#[derive(Clone, Default)]
pub struct PipelineState {
    pub if_id: IfIdSlot,
    pub id_ex: IdExSlot,
    pub ex_mem: ExMemSlot,
    pub mem_wb: MemWbSlot,
}
