//! Instruction semantics and per-instruction clock costs.
//!
//! Memory forms additionally pay the effective-address cost computed by the
//! decoder and four cycles for every word access at an odd offset.

use crate::alu::{
    aaa, aas, binary_op, daa, das, dec_with_flags, inc_with_flags, logic_with_flags,
    shift_with_flags, sub_with_flags, update_szp,
};
use crate::bus::IoBus;
use crate::cpu::{Cpu, StepOutcome};
use crate::decode::{Instruction, ModRm, Operand, RepPrefix};
use crate::state::{Flags, Reg16, SegReg, Width};

/// Vector raised on divide error.
const DIVIDE_ERROR: u8 = 0;
const BREAKPOINT: u8 = 3;
const OVERFLOW: u8 = 4;

impl<B: IoBus> Cpu<B> {
    pub(crate) fn execute(&mut self, insn: &Instruction) -> StepOutcome {
        if let Some(m) = insn.modrm {
            self.charge(m.ea_cycles);
        }

        let op = insn.opcode;
        let w = insn.width;
        match op {
            0x00..=0x3F if op & 7 < 4 => self.alu_rm(insn),
            0x00..=0x3F if op & 7 < 6 => {
                let acc = self.state.reg(0, w);
                if let Some(res) = binary_op(&mut self.state.flags, op >> 3, acc, insn.imm, w) {
                    self.state.set_reg(0, w, res);
                }
                self.charge(4);
            }
            0x06 | 0x0E | 0x16 | 0x1E => {
                let seg = SegReg::from_index(op >> 3);
                self.push16(self.state.seg(seg));
                self.charge(10);
            }
            0x07 | 0x0F | 0x17 | 0x1F => {
                let seg = SegReg::from_index(op >> 3);
                let val = self.pop16();
                self.state.set_seg(seg, val);
                self.charge(8);
            }
            0x27 => {
                let al = self.state.al();
                let al = daa(&mut self.state.flags, al);
                self.state.set_al(al);
                self.charge(4);
            }
            0x2F => {
                let al = self.state.al();
                let al = das(&mut self.state.flags, al);
                self.state.set_al(al);
                self.charge(4);
            }
            0x37 => {
                let ax = self.state.ax();
                let ax = aaa(&mut self.state.flags, ax);
                self.state.set_ax(ax);
                self.charge(4);
            }
            0x3F => {
                let ax = self.state.ax();
                let ax = aas(&mut self.state.flags, ax);
                self.state.set_ax(ax);
                self.charge(4);
            }
            0x40..=0x4F => {
                let reg = Reg16::from_index(op);
                let val = self.state.reg16(reg);
                let res = if op < 0x48 {
                    inc_with_flags(&mut self.state.flags, val, Width::Word)
                } else {
                    dec_with_flags(&mut self.state.flags, val, Width::Word)
                };
                self.state.set_reg16(reg, res);
                self.charge(2);
            }
            0x50..=0x57 => {
                let reg = Reg16::from_index(op);
                // PUSH SP stores the already decremented pointer.
                let val = match reg {
                    Reg16::Sp => self.state.sp().wrapping_sub(2),
                    _ => self.state.reg16(reg),
                };
                self.push16(val);
                self.charge(11);
            }
            0x58..=0x5F => {
                let val = self.pop16();
                self.state.set_reg16(Reg16::from_index(op), val);
                self.charge(8);
            }
            0x70..=0x7F => {
                if self.condition(op & 0x0F) {
                    self.jump_relative(insn.imm8_sext());
                    self.charge(16);
                } else {
                    self.charge(4);
                }
            }
            0x80..=0x83 => self.group1(insn),
            0x84 | 0x85 => {
                if let Some(m) = insn.modrm {
                    let a = self.read_operand(m.operand, w);
                    let b = self.state.reg(m.reg, w);
                    logic_with_flags(&mut self.state.flags, a & b, w);
                    self.charge(if m.is_reg() { 3 } else { 9 });
                }
            }
            0x86 | 0x87 => {
                if let Some(m) = insn.modrm {
                    let a = self.read_operand(m.operand, w);
                    let b = self.state.reg(m.reg, w);
                    self.write_operand(m.operand, w, b);
                    self.state.set_reg(m.reg, w, a);
                    self.charge(if m.is_reg() { 3 } else { 17 });
                }
            }
            0x88..=0x8B => {
                if let Some(m) = insn.modrm {
                    if insn.reg_is_dest {
                        let val = self.read_operand(m.operand, w);
                        self.state.set_reg(m.reg, w, val);
                        self.charge(if m.is_reg() { 2 } else { 8 });
                    } else {
                        let val = self.state.reg(m.reg, w);
                        self.write_operand(m.operand, w, val);
                        self.charge(if m.is_reg() { 2 } else { 9 });
                    }
                }
            }
            0x8C => {
                if let Some(m) = insn.modrm {
                    let val = self.state.seg(SegReg::from_index(m.reg));
                    self.write_operand(m.operand, Width::Word, val);
                    self.charge(if m.is_reg() { 2 } else { 9 });
                }
            }
            0x8D => {
                if let Some(ModRm {
                    reg,
                    operand: Operand::Mem { offset, .. },
                    ..
                }) = insn.modrm
                {
                    self.state.set_reg(reg, Width::Word, offset);
                    self.charge(2);
                }
            }
            0x8E => {
                if let Some(m) = insn.modrm {
                    let val = self.read_operand(m.operand, Width::Word);
                    self.state.set_seg(SegReg::from_index(m.reg), val);
                    self.charge(if m.is_reg() { 2 } else { 8 });
                }
            }
            0x8F => {
                if let Some(m) = insn.modrm {
                    let val = self.pop16();
                    self.write_operand(m.operand, Width::Word, val);
                    self.charge(if m.is_reg() { 8 } else { 17 });
                }
            }
            0x90..=0x97 => {
                let reg = Reg16::from_index(op);
                let ax = self.state.ax();
                self.state.set_ax(self.state.reg16(reg));
                self.state.set_reg16(reg, ax);
                self.charge(3);
            }
            0x98 => {
                let al = self.state.al();
                self.state.set_ax(al as i8 as i16 as u16);
                self.charge(2);
            }
            0x99 => {
                let dx = if self.state.ax() & 0x8000 != 0 { 0xFFFF } else { 0 };
                self.state.set_dx(dx);
                self.charge(5);
            }
            0x9A => {
                self.call_far(insn.imm2, insn.imm);
                self.charge(28);
            }
            0x9B => self.charge(3),
            0x9C => {
                self.push16(self.state.flags.bits());
                self.charge(10);
            }
            0x9D => {
                let val = self.pop16();
                self.state.flags = Flags::from_bits_retain(val);
                self.charge(8);
            }
            0x9E => {
                let bits = (self.state.flags.bits() & 0xFF00) | u16::from(self.state.ah());
                self.state.flags = Flags::from_bits_retain(bits);
                self.charge(4);
            }
            0x9F => {
                self.state.set_ah(self.state.flags.bits() as u8);
                self.charge(4);
            }
            0xA0..=0xA3 => {
                let seg = insn.data_segment();
                if op < 0xA2 {
                    let val = self.read_mem(seg, insn.imm, w);
                    self.state.set_reg(0, w, val);
                } else {
                    let val = self.state.reg(0, w);
                    self.write_mem(seg, insn.imm, w, val);
                }
                self.charge(10);
            }
            0xA4..=0xA7 | 0xAA..=0xAF => self.string_op(insn),
            0xA8 | 0xA9 => {
                let acc = self.state.reg(0, w);
                logic_with_flags(&mut self.state.flags, acc & insn.imm, w);
                self.charge(4);
            }
            0xB0..=0xBF => {
                let width = if op < 0xB8 { Width::Byte } else { Width::Word };
                self.state.set_reg(op & 7, width, insn.imm);
                self.charge(4);
            }
            0xC2 | 0xC3 => {
                self.state.ip = self.pop16();
                if op == 0xC2 {
                    self.state.set_sp(self.state.sp().wrapping_add(insn.imm));
                    self.charge(12);
                } else {
                    self.charge(8);
                }
            }
            0xC4 | 0xC5 => {
                if let Some(ModRm {
                    reg,
                    operand: Operand::Mem { seg, offset },
                    ..
                }) = insn.modrm
                {
                    let val = self.read_mem(seg, offset, Width::Word);
                    let selector = self.read_mem(seg, offset.wrapping_add(2), Width::Word);
                    self.state.set_reg(reg, Width::Word, val);
                    let target = if op == 0xC4 { SegReg::Es } else { SegReg::Ds };
                    self.state.set_seg(target, selector);
                    self.charge(16);
                }
            }
            0xC6 | 0xC7 => {
                if let Some(m) = insn.modrm.filter(|m| m.reg == 0) {
                    self.write_operand(m.operand, w, insn.imm);
                    self.charge(if m.is_reg() { 4 } else { 10 });
                }
            }
            0xCA | 0xCB => {
                self.state.ip = self.pop16();
                let cs = self.pop16();
                self.state.set_seg(SegReg::Cs, cs);
                if op == 0xCA {
                    self.state.set_sp(self.state.sp().wrapping_add(insn.imm));
                    self.charge(17);
                } else {
                    self.charge(18);
                }
            }
            0xCC => {
                self.interrupt(BREAKPOINT);
                self.charge(52);
            }
            0xCD => {
                self.interrupt(insn.imm as u8);
                self.charge(51);
            }
            0xCE => {
                if self.state.flag(Flags::OF) {
                    self.interrupt(OVERFLOW);
                    self.charge(53);
                } else {
                    self.charge(4);
                }
            }
            0xCF => {
                self.state.ip = self.pop16();
                let cs = self.pop16();
                self.state.set_seg(SegReg::Cs, cs);
                let flags = self.pop16();
                self.state.flags = Flags::from_bits_retain(flags);
                self.charge(24);
            }
            0xD0..=0xD3 => {
                if let Some(m) = insn.modrm {
                    let count = if op & 0b10 != 0 { self.state.reg8(1) } else { 1 };
                    let val = self.read_operand(m.operand, w);
                    let res = shift_with_flags(&mut self.state.flags, m.reg, val, count, w);
                    self.write_operand(m.operand, w, res);
                    let per_bit = 4 * u32::from(count);
                    self.charge(match (op & 0b10 != 0, m.is_reg()) {
                        (false, true) => 2,
                        (false, false) => 15,
                        (true, true) => 8 + per_bit,
                        (true, false) => 20 + per_bit,
                    });
                }
            }
            0xD4 => {
                let base = insn.imm as u8;
                if base == 0 {
                    self.interrupt(DIVIDE_ERROR);
                } else {
                    let al = self.state.al();
                    self.state.set_ah(al / base);
                    self.state.set_al(al % base);
                    update_szp(&mut self.state.flags, u16::from(al % base), Width::Byte);
                }
                self.charge(83);
            }
            0xD5 => {
                let base = insn.imm as u8;
                let al = self
                    .state
                    .ah()
                    .wrapping_mul(base)
                    .wrapping_add(self.state.al());
                self.state.set_ax(u16::from(al));
                update_szp(&mut self.state.flags, u16::from(al), Width::Byte);
                self.charge(60);
            }
            0xD7 => {
                let off = self.state.bx().wrapping_add(u16::from(self.state.al()));
                let val = self.read_mem(insn.data_segment(), off, Width::Byte);
                self.state.set_al(val as u8);
                self.charge(11);
            }
            0xD8..=0xDF => {
                let reg_form = insn.modrm.map_or(true, |m| m.is_reg());
                self.charge(if reg_form { 2 } else { 8 });
            }
            0xE0..=0xE2 => {
                let cx = self.state.cx().wrapping_sub(1);
                self.state.set_cx(cx);
                let zf = self.state.flag(Flags::ZF);
                let (taken, hit, miss) = match op {
                    0xE0 => (cx != 0 && !zf, 19, 5),
                    0xE1 => (cx != 0 && zf, 18, 6),
                    _ => (cx != 0, 17, 5),
                };
                if taken {
                    self.jump_relative(insn.imm8_sext());
                    self.charge(hit);
                } else {
                    self.charge(miss);
                }
            }
            0xE3 => {
                if self.state.cx() == 0 {
                    self.jump_relative(insn.imm8_sext());
                    self.charge(18);
                } else {
                    self.charge(6);
                }
            }
            0xE4..=0xE7 | 0xEC..=0xEF => {
                let (port, cost) = if op < 0xEC {
                    (insn.imm & 0xFF, 10)
                } else {
                    (self.state.dx(), 8)
                };
                if op & 0b10 == 0 {
                    let val = self.io_read(port, w);
                    self.state.set_reg(0, w, val);
                } else {
                    let val = self.state.reg(0, w);
                    self.io_write(port, w, val);
                }
                let odd_word = w == Width::Word && port & 1 != 0;
                self.charge(cost + if odd_word { 4 } else { 0 });
            }
            0xE8 => {
                self.push16(self.state.ip);
                self.jump_relative(insn.imm);
                self.charge(19);
            }
            0xE9 => {
                self.jump_relative(insn.imm);
                self.charge(15);
            }
            0xEA => {
                self.state.set_seg(SegReg::Cs, insn.imm2);
                self.state.ip = insn.imm;
                self.charge(15);
            }
            0xEB => {
                self.jump_relative(insn.imm8_sext());
                self.charge(15);
            }
            0xF0 => self.charge(2),
            0xF4 => {
                self.halt();
                self.charge(2);
                return StepOutcome::Halted;
            }
            0xF5 => {
                self.state.flags.toggle(Flags::CF);
                self.charge(2);
            }
            0xF6 | 0xF7 => self.group3(insn),
            0xF8..=0xFD => {
                let (flag, on) = match op {
                    0xF8 => (Flags::CF, false),
                    0xF9 => (Flags::CF, true),
                    0xFA => (Flags::IF, false),
                    0xFB => (Flags::IF, true),
                    0xFC => (Flags::DF, false),
                    _ => (Flags::DF, true),
                };
                self.state.set_flag(flag, on);
                self.charge(2);
            }
            0xFE | 0xFF => self.group45(insn),
            // Undefined encodings (0x60..=0x6F, 0xC0, 0xC1, 0xC8, 0xC9, 0xD6, 0xF1)
            // fall through as one-byte no-ops.
            _ => {}
        }
        StepOutcome::Executed
    }

    fn condition(&self, cc: u8) -> bool {
        let f = |flag| self.state.flag(flag);
        let taken = match cc >> 1 {
            0 => f(Flags::OF),
            1 => f(Flags::CF),
            2 => f(Flags::ZF),
            3 => f(Flags::CF) || f(Flags::ZF),
            4 => f(Flags::SF),
            5 => f(Flags::PF),
            6 => f(Flags::SF) != f(Flags::OF),
            _ => f(Flags::ZF) || f(Flags::SF) != f(Flags::OF),
        };
        taken ^ (cc & 1 != 0)
    }

    fn jump_relative(&mut self, disp: u16) {
        self.state.ip = self.state.ip.wrapping_add(disp);
    }

    fn call_far(&mut self, cs: u16, ip: u16) {
        self.push16(self.state.cs());
        self.push16(self.state.ip);
        self.state.set_seg(SegReg::Cs, cs);
        self.state.ip = ip;
    }

    fn alu_rm(&mut self, insn: &Instruction) {
        let Some(m) = insn.modrm else {
            return;
        };
        let w = insn.width;
        let kind = insn.opcode >> 3;
        let reg = Operand::Reg(m.reg);
        let (dst_op, src_op) = if insn.reg_is_dest {
            (reg, m.operand)
        } else {
            (m.operand, reg)
        };

        let dst = self.read_operand(dst_op, w);
        let src = self.read_operand(src_op, w);
        if let Some(res) = binary_op(&mut self.state.flags, kind, dst, src, w) {
            self.write_operand(dst_op, w, res);
        }

        let cycles = if m.is_reg() {
            3
        } else if kind == 7 || insn.reg_is_dest {
            9
        } else {
            16
        };
        self.charge(cycles);
    }

    /// `0x80..=0x83`: ALU operation with an immediate. `0x82` aliases `0x80`;
    /// `0x83` sign-extends its byte immediate.
    fn group1(&mut self, insn: &Instruction) {
        let Some(m) = insn.modrm else {
            return;
        };
        let w = insn.width;
        let src = if insn.opcode == 0x83 {
            insn.imm8_sext()
        } else {
            insn.imm
        };
        let dst = self.read_operand(m.operand, w);
        if let Some(res) = binary_op(&mut self.state.flags, m.reg, dst, src, w) {
            self.write_operand(m.operand, w, res);
        }
        self.charge(match (m.is_reg(), m.reg == 7) {
            (true, _) => 4,
            (false, true) => 10,
            (false, false) => 17,
        });
    }

    fn string_op(&mut self, insn: &Instruction) {
        let w = insn.width;
        let step = if self.state.flag(Flags::DF) {
            w.bytes().wrapping_neg()
        } else {
            w.bytes()
        };
        let src_seg = insn.data_segment();
        let repeated = insn.prefixes.rep != RepPrefix::None;
        let si = self.state.si();
        let di = self.state.di();

        match insn.opcode & !1 {
            0xA4 => {
                let val = self.read_mem(src_seg, si, w);
                self.write_mem(SegReg::Es, di, w, val);
                self.state.set_si(si.wrapping_add(step));
                self.state.set_di(di.wrapping_add(step));
                self.charge(if repeated { 17 } else { 18 });
            }
            0xA6 => {
                let a = self.read_mem(src_seg, si, w);
                let b = self.read_mem(SegReg::Es, di, w);
                sub_with_flags(&mut self.state.flags, a, b, false, w);
                self.state.set_si(si.wrapping_add(step));
                self.state.set_di(di.wrapping_add(step));
                self.charge(22);
            }
            0xAA => {
                let val = self.state.reg(0, w);
                self.write_mem(SegReg::Es, di, w, val);
                self.state.set_di(di.wrapping_add(step));
                self.charge(if repeated { 10 } else { 11 });
            }
            0xAC => {
                let val = self.read_mem(src_seg, si, w);
                self.state.set_reg(0, w, val);
                self.state.set_si(si.wrapping_add(step));
                self.charge(if repeated { 13 } else { 12 });
            }
            _ => {
                let acc = self.state.reg(0, w);
                let b = self.read_mem(SegReg::Es, di, w);
                sub_with_flags(&mut self.state.flags, acc, b, false, w);
                self.state.set_di(di.wrapping_add(step));
                self.charge(15);
            }
        }
    }

    /// `0xF6`/`0xF7`: TEST/NOT/NEG/MUL/IMUL/DIV/IDIV.
    ///
    /// Multiply and divide use fixed clock counts (midpoint of the
    /// data-dependent range).
    fn group3(&mut self, insn: &Instruction) {
        let Some(m) = insn.modrm else {
            return;
        };
        let w = insn.width;
        let reg_form = m.is_reg();
        let pick = |reg: u32, mem: u32| if reg_form { reg } else { mem };
        let src = self.read_operand(m.operand, w);

        match m.reg {
            0 => {
                logic_with_flags(&mut self.state.flags, src & insn.imm, w);
                self.charge(pick(5, 11));
            }
            2 => {
                self.write_operand(m.operand, w, !src & w.mask());
                self.charge(pick(3, 16));
            }
            3 => {
                let res = sub_with_flags(&mut self.state.flags, 0, src, false, w);
                self.state.set_flag(Flags::CF, res != 0);
                self.write_operand(m.operand, w, res);
                self.charge(pick(3, 16));
            }
            4 => {
                let wide = match w {
                    Width::Byte => {
                        let res = u16::from(self.state.al()) * (src & 0xFF);
                        self.state.set_ax(res);
                        res >> 8 != 0
                    }
                    Width::Word => {
                        let res = u32::from(self.state.ax()) * u32::from(src);
                        self.state.set_ax(res as u16);
                        self.state.set_dx((res >> 16) as u16);
                        res >> 16 != 0
                    }
                };
                self.state.set_flag(Flags::CF, wide);
                self.state.set_flag(Flags::OF, wide);
                self.charge(match w {
                    Width::Byte => pick(73, 79),
                    Width::Word => pick(125, 131),
                });
            }
            5 => {
                let wide = match w {
                    Width::Byte => {
                        let res = i16::from(self.state.al() as i8) * i16::from(src as u8 as i8);
                        self.state.set_ax(res as u16);
                        res != i16::from(res as i8)
                    }
                    Width::Word => {
                        let res = i32::from(self.state.ax() as i16) * i32::from(src as i16);
                        self.state.set_ax(res as u16);
                        self.state.set_dx((res >> 16) as u16);
                        res != i32::from(res as i16)
                    }
                };
                self.state.set_flag(Flags::CF, wide);
                self.state.set_flag(Flags::OF, wide);
                self.charge(match w {
                    Width::Byte => pick(89, 95),
                    Width::Word => pick(141, 147),
                });
            }
            6 => {
                let ok = match w {
                    Width::Byte => self.div8(src as u8),
                    Width::Word => self.div16(src),
                };
                if !ok {
                    self.interrupt(DIVIDE_ERROR);
                }
                self.charge(match w {
                    Width::Byte => pick(85, 91),
                    Width::Word => pick(153, 159),
                });
            }
            7 => {
                let ok = match w {
                    Width::Byte => self.idiv8(src as u8),
                    Width::Word => self.idiv16(src),
                };
                if !ok {
                    self.interrupt(DIVIDE_ERROR);
                }
                self.charge(match w {
                    Width::Byte => pick(106, 112),
                    Width::Word => pick(174, 180),
                });
            }
            _ => {}
        }
    }

    /// Returns `false` (leaving registers untouched) on divide error.
    fn div8(&mut self, divisor: u8) -> bool {
        if divisor == 0 {
            return false;
        }
        let dividend = self.state.ax();
        let quotient = dividend / u16::from(divisor);
        if quotient > 0xFF {
            return false;
        }
        self.state.set_al(quotient as u8);
        self.state.set_ah((dividend % u16::from(divisor)) as u8);
        true
    }

    fn div16(&mut self, divisor: u16) -> bool {
        if divisor == 0 {
            return false;
        }
        let dividend = (u32::from(self.state.dx()) << 16) | u32::from(self.state.ax());
        let quotient = dividend / u32::from(divisor);
        if quotient > 0xFFFF {
            return false;
        }
        self.state.set_ax(quotient as u16);
        self.state.set_dx((dividend % u32::from(divisor)) as u16);
        true
    }

    /// Signed quotients must lie in -127..=127.
    fn idiv8(&mut self, divisor: u8) -> bool {
        if divisor == 0 {
            return false;
        }
        let dividend = i32::from(self.state.ax() as i16);
        let divisor = i32::from(divisor as i8);
        let quotient = dividend / divisor;
        if !(-0x7F..=0x7F).contains(&quotient) {
            return false;
        }
        self.state.set_al(quotient as u8);
        self.state.set_ah((dividend % divisor) as u8);
        true
    }

    /// Signed quotients must lie in -32767..=32767.
    fn idiv16(&mut self, divisor: u16) -> bool {
        if divisor == 0 {
            return false;
        }
        let dividend =
            i64::from(((u32::from(self.state.dx()) << 16) | u32::from(self.state.ax())) as i32);
        let divisor = i64::from(divisor as i16);
        let quotient = dividend / divisor;
        if !(-0x7FFF..=0x7FFF).contains(&quotient) {
            return false;
        }
        self.state.set_ax(quotient as u16);
        self.state.set_dx((dividend % divisor) as u16);
        true
    }

    /// `0xFE` (INC/DEC byte) and `0xFF` (INC/DEC/CALL/JMP/PUSH word).
    fn group45(&mut self, insn: &Instruction) {
        let Some(m) = insn.modrm else {
            return;
        };
        let w = insn.width;
        let reg_form = m.is_reg();
        let pick = |reg: u32, mem: u32| if reg_form { reg } else { mem };

        match (insn.opcode, m.reg) {
            (_, 0) | (_, 1) => {
                let val = self.read_operand(m.operand, w);
                let res = if m.reg == 0 {
                    inc_with_flags(&mut self.state.flags, val, w)
                } else {
                    dec_with_flags(&mut self.state.flags, val, w)
                };
                self.write_operand(m.operand, w, res);
                self.charge(pick(3, 15));
            }
            (0xFF, 2) => {
                let target = self.read_operand(m.operand, Width::Word);
                self.push16(self.state.ip);
                self.state.ip = target;
                self.charge(pick(16, 21));
            }
            (0xFF, 4) => {
                self.state.ip = self.read_operand(m.operand, Width::Word);
                self.charge(pick(11, 18));
            }
            (0xFF, 3) | (0xFF, 5) => {
                if let Operand::Mem { seg, offset } = m.operand {
                    let ip = self.read_mem(seg, offset, Width::Word);
                    let cs = self.read_mem(seg, offset.wrapping_add(2), Width::Word);
                    if m.reg == 3 {
                        self.call_far(cs, ip);
                        self.charge(37);
                    } else {
                        self.state.set_seg(SegReg::Cs, cs);
                        self.state.ip = ip;
                        self.charge(24);
                    }
                }
            }
            (0xFF, 6) => {
                let val = self.read_operand(m.operand, Width::Word);
                self.push16(val);
                self.charge(pick(11, 16));
            }
            _ => {}
        }
    }
}
