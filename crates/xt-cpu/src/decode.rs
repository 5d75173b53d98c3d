//! Instruction decoding.
//!
//! Decoding turns the prefetch queue into an immutable [`Instruction`] with
//! its addressing-mode operand already resolved against the current register
//! file. Execution never re-reads instruction bytes.

use crate::state::{CpuState, Reg16, SegReg, Width};

/// Longest un-prefixed instruction: opcode, ModRM, disp16, imm16.
pub const QUEUE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepPrefix {
    #[default]
    None,
    /// `0xF3`: REP / REPE / REPZ.
    RepE,
    /// `0xF2`: REPNE / REPNZ.
    RepNe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Prefixes {
    pub segment: Option<SegReg>,
    pub rep: RepPrefix,
    /// Number of prefix bytes consumed.
    pub len: u16,
}

impl Prefixes {
    /// Applies one prefix byte, returning the clock cost, or `None` if `byte`
    /// is not a prefix.
    pub fn absorb(&mut self, byte: u8) -> Option<u32> {
        let cost = match byte {
            0x26 => {
                self.segment = Some(SegReg::Es);
                2
            }
            0x2E => {
                self.segment = Some(SegReg::Cs);
                2
            }
            0x36 => {
                self.segment = Some(SegReg::Ss);
                2
            }
            0x3E => {
                self.segment = Some(SegReg::Ds);
                2
            }
            0xF2 => {
                self.rep = RepPrefix::RepNe;
                9
            }
            0xF3 => {
                self.rep = RepPrefix::RepE;
                9
            }
            _ => return None,
        };
        self.len += 1;
        Some(cost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Register by encoding index; width comes from the instruction.
    Reg(u8),
    Mem { seg: SegReg, offset: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    pub mode: u8,
    pub reg: u8,
    pub rm: u8,
    pub operand: Operand,
    /// Effective-address calculation cost; zero for register operands.
    pub ea_cycles: u32,
}

impl ModRm {
    pub fn is_reg(&self) -> bool {
        self.mode == 0b11
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub prefixes: Prefixes,
    pub width: Width,
    /// The `d` bit: the `reg` field names the destination.
    pub reg_is_dest: bool,
    pub modrm: Option<ModRm>,
    /// First immediate (or displacement/offset), raw and zero-extended.
    pub imm: u16,
    /// Segment half of a far pointer.
    pub imm2: u16,
    /// Length from the opcode byte onwards; prefixes are not counted.
    pub len: u16,
}

impl Instruction {
    /// Default data segment unless overridden.
    pub fn data_segment(&self) -> SegReg {
        self.prefixes.segment.unwrap_or(SegReg::Ds)
    }

    pub fn imm8_sext(&self) -> u16 {
        self.imm as u8 as i8 as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Imm {
    None,
    Byte,
    Word,
    Far,
}

pub fn has_modrm(op: u8) -> bool {
    matches!(
        op,
        0x00..=0x03
            | 0x08..=0x0B
            | 0x10..=0x13
            | 0x18..=0x1B
            | 0x20..=0x23
            | 0x28..=0x2B
            | 0x30..=0x33
            | 0x38..=0x3B
            | 0x80..=0x8F
            | 0xC4..=0xC7
            | 0xD0..=0xD3
            | 0xD8..=0xDF
            | 0xF6
            | 0xF7
            | 0xFE
            | 0xFF
    )
}

fn immediate(op: u8, reg: u8) -> Imm {
    match op {
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => Imm::Byte,
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => Imm::Word,
        0x70..=0x7F => Imm::Byte,
        0x80 | 0x82 | 0x83 => Imm::Byte,
        0x81 => Imm::Word,
        0x9A | 0xEA => Imm::Far,
        0xA0..=0xA3 => Imm::Word,
        0xA8 => Imm::Byte,
        0xA9 => Imm::Word,
        0xB0..=0xB7 => Imm::Byte,
        0xB8..=0xBF => Imm::Word,
        0xC2 | 0xCA => Imm::Word,
        0xC6 => Imm::Byte,
        0xC7 => Imm::Word,
        0xCD | 0xD4 | 0xD5 => Imm::Byte,
        0xE0..=0xE7 | 0xEB => Imm::Byte,
        0xE8 | 0xE9 => Imm::Word,
        0xF6 if reg == 0 => Imm::Byte,
        0xF7 if reg == 0 => Imm::Word,
        _ => Imm::None,
    }
}

/// Resolve the memory form of a ModRM byte.
///
/// `disp` is the already sign-extended displacement. BP-based forms default
/// to SS.
fn effective_address(
    state: &CpuState,
    mode: u8,
    rm: u8,
    disp: u16,
    segment: Option<SegReg>,
) -> (SegReg, u16, u32) {
    let r = |reg| state.reg16(reg);
    let (base, default_seg, cycles) = match rm {
        0b000 => (r(Reg16::Bx).wrapping_add(r(Reg16::Si)), SegReg::Ds, 7),
        0b001 => (r(Reg16::Bx).wrapping_add(r(Reg16::Di)), SegReg::Ds, 8),
        0b010 => (r(Reg16::Bp).wrapping_add(r(Reg16::Si)), SegReg::Ss, 8),
        0b011 => (r(Reg16::Bp).wrapping_add(r(Reg16::Di)), SegReg::Ss, 7),
        0b100 => (r(Reg16::Si), SegReg::Ds, 5),
        0b101 => (r(Reg16::Di), SegReg::Ds, 5),
        0b110 if mode == 0b00 => (0, SegReg::Ds, 6),
        0b110 => (r(Reg16::Bp), SegReg::Ss, 5),
        _ => (r(Reg16::Bx), SegReg::Ds, 5),
    };
    let disp_cycles = if matches!(mode, 0b01 | 0b10) { 4 } else { 0 };
    (
        segment.unwrap_or(default_seg),
        base.wrapping_add(disp),
        cycles + disp_cycles,
    )
}

/// Decode one instruction from `queue`, which holds the bytes starting at
/// the opcode.
pub fn decode(queue: &[u8; QUEUE_LEN], state: &CpuState, prefixes: Prefixes) -> Instruction {
    let opcode = queue[0];
    let byte = |i: usize| queue.get(i).copied().unwrap_or(0);
    let word = |i: usize| u16::from_le_bytes([byte(i), byte(i + 1)]);

    let mut pos = 1usize;
    let mut reg_field = 0u8;
    let modrm = if has_modrm(opcode) {
        let b = byte(1);
        pos = 2;
        let mode = b >> 6;
        let reg = (b >> 3) & 7;
        let rm = b & 7;
        reg_field = reg;

        let disp = match mode {
            0b01 => {
                pos += 1;
                byte(2) as i8 as u16
            }
            0b10 => {
                pos += 2;
                word(2)
            }
            0b00 if rm == 0b110 => {
                pos += 2;
                word(2)
            }
            _ => 0,
        };

        let (operand, ea_cycles) = if mode == 0b11 {
            (Operand::Reg(rm), 0)
        } else {
            let (seg, offset, cycles) =
                effective_address(state, mode, rm, disp, prefixes.segment);
            (Operand::Mem { seg, offset }, cycles)
        };
        Some(ModRm {
            mode,
            reg,
            rm,
            operand,
            ea_cycles,
        })
    } else {
        None
    };

    let (imm, imm2) = match immediate(opcode, reg_field) {
        Imm::None => (0, 0),
        Imm::Byte => {
            let v = u16::from(byte(pos));
            pos += 1;
            (v, 0)
        }
        Imm::Word => {
            let v = word(pos);
            pos += 2;
            (v, 0)
        }
        Imm::Far => {
            let off = word(pos);
            let seg = word(pos + 2);
            pos += 4;
            (off, seg)
        }
    };

    Instruction {
        opcode,
        prefixes,
        width: Width::from_w_bit(opcode),
        reg_is_dest: opcode & 0b10 != 0,
        modrm,
        imm,
        imm2,
        len: pos as u16,
    }
}
