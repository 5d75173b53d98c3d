//! Architectural register file of the 16-bit core.

use bitflags::bitflags;

bitflags! {
    /// FLAGS register bits. Bits outside the named set are stored verbatim so
    /// `POPF`/`IRET` round-trip whatever the guest pushed.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u16 {
        const CF = 1 << 0;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const TF = 1 << 8;
        const IF = 1 << 9;
        const DF = 1 << 10;
        const OF = 1 << 11;
    }
}

/// Operand width selected by the `w` bit of most opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub fn from_w_bit(op: u8) -> Self {
        if op & 1 == 0 {
            Width::Byte
        } else {
            Width::Word
        }
    }

    pub fn mask(self) -> u16 {
        match self {
            Width::Byte => 0x00FF,
            Width::Word => 0xFFFF,
        }
    }

    pub fn sign_bit(self) -> u16 {
        match self {
            Width::Byte => 0x0080,
            Width::Word => 0x8000,
        }
    }

    pub fn bytes(self) -> u16 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
        }
    }
}

/// General purpose 16-bit registers in ModRM encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Reg16 {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl Reg16 {
    pub fn from_index(index: u8) -> Self {
        match index & 7 {
            0 => Reg16::Ax,
            1 => Reg16::Cx,
            2 => Reg16::Dx,
            3 => Reg16::Bx,
            4 => Reg16::Sp,
            5 => Reg16::Bp,
            6 => Reg16::Si,
            _ => Reg16::Di,
        }
    }
}

/// Segment registers in ModRM `sreg` encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SegReg {
    Es = 0,
    Cs = 1,
    Ss = 2,
    Ds = 3,
}

impl SegReg {
    /// Only the low two bits of the `sreg` field are decoded.
    pub fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => SegReg::Es,
            1 => SegReg::Cs,
            2 => SegReg::Ss,
            _ => SegReg::Ds,
        }
    }
}

/// Physical address of `seg:off`, wrapped to the 20-bit address space.
pub fn seg_off(seg: u16, off: u16) -> u32 {
    ((u32::from(seg) << 4) + u32::from(off)) & crate::mem::ADDRESS_MASK
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    regs: [u16; 8],
    segs: [u16; 4],
    pub ip: u16,
    pub flags: Flags,
}

impl Default for CpuState {
    fn default() -> Self {
        let mut state = Self {
            regs: [0; 8],
            segs: [0; 4],
            ip: 0,
            flags: Flags::empty(),
        };
        state.reset();
        state
    }
}

macro_rules! reg16_accessors {
    ($($get:ident, $set:ident => $reg:ident;)*) => {
        $(
            pub fn $get(&self) -> u16 {
                self.reg16(Reg16::$reg)
            }

            pub fn $set(&mut self, val: u16) {
                self.set_reg16(Reg16::$reg, val);
            }
        )*
    };
}

impl CpuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on values: execution starts at `FFFF:0000` with all flags clear.
    ///
    /// General registers are left untouched.
    pub fn reset(&mut self) {
        self.flags = Flags::empty();
        self.ip = 0;
        self.set_seg(SegReg::Cs, 0xFFFF);
        self.set_seg(SegReg::Ds, 0);
        self.set_seg(SegReg::Ss, 0);
        self.set_seg(SegReg::Es, 0);
    }

    pub fn reg16(&self, reg: Reg16) -> u16 {
        self.regs[reg as usize]
    }

    pub fn set_reg16(&mut self, reg: Reg16, val: u16) {
        self.regs[reg as usize] = val;
    }

    /// 8-bit register by encoding: 0..=3 are AL/CL/DL/BL, 4..=7 are AH/CH/DH/BH.
    pub fn reg8(&self, index: u8) -> u8 {
        let index = index & 7;
        let word = self.regs[usize::from(index & 3)];
        if index < 4 {
            word as u8
        } else {
            (word >> 8) as u8
        }
    }

    pub fn set_reg8(&mut self, index: u8, val: u8) {
        let index = index & 7;
        let word = &mut self.regs[usize::from(index & 3)];
        if index < 4 {
            *word = (*word & 0xFF00) | u16::from(val);
        } else {
            *word = (*word & 0x00FF) | (u16::from(val) << 8);
        }
    }

    /// Register operand by encoding index at the given width.
    pub fn reg(&self, index: u8, width: Width) -> u16 {
        match width {
            Width::Byte => u16::from(self.reg8(index)),
            Width::Word => self.reg16(Reg16::from_index(index)),
        }
    }

    pub fn set_reg(&mut self, index: u8, width: Width, val: u16) {
        match width {
            Width::Byte => self.set_reg8(index, val as u8),
            Width::Word => self.set_reg16(Reg16::from_index(index), val),
        }
    }

    pub fn seg(&self, seg: SegReg) -> u16 {
        self.segs[seg as usize]
    }

    pub fn set_seg(&mut self, seg: SegReg, val: u16) {
        self.segs[seg as usize] = val;
    }

    reg16_accessors! {
        ax, set_ax => Ax;
        cx, set_cx => Cx;
        dx, set_dx => Dx;
        bx, set_bx => Bx;
        sp, set_sp => Sp;
        bp, set_bp => Bp;
        si, set_si => Si;
        di, set_di => Di;
    }

    pub fn al(&self) -> u8 {
        self.reg8(0)
    }

    pub fn set_al(&mut self, val: u8) {
        self.set_reg8(0, val);
    }

    pub fn ah(&self) -> u8 {
        self.reg8(4)
    }

    pub fn set_ah(&mut self, val: u8) {
        self.set_reg8(4, val);
    }

    pub fn cs(&self) -> u16 {
        self.seg(SegReg::Cs)
    }

    pub fn ds(&self) -> u16 {
        self.seg(SegReg::Ds)
    }

    pub fn ss(&self) -> u16 {
        self.seg(SegReg::Ss)
    }

    pub fn es(&self) -> u16 {
        self.seg(SegReg::Es)
    }

    pub fn flag(&self, flag: Flags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: Flags, on: bool) {
        self.flags.set(flag, on);
    }

    /// Physical address of the next instruction byte.
    pub fn phys_ip(&self) -> u32 {
        seg_off(self.cs(), self.ip)
    }
}
